//! OpenAI Responses API provider adapter.

mod adapter;
mod schema;
mod settings;
mod wire;

pub use adapter::OpenAiAdapter;
pub use settings::OpenAiSettings;
