//! Google Gemini `generateContent` provider adapter.

mod adapter;
mod schema;
mod settings;
mod wire;

pub use adapter::GeminiAdapter;
pub use settings::GeminiSettings;
