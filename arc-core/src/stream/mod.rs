//! Streaming Bus: session-scoped event broadcast with
//! async-context log/event propagation, TTL eviction, and a bounded,
//! backpressured event queue.

mod context;
mod events;
mod session;

pub use context::{current_session_id, emit, is_cancelled, log_error, log_info, log_warn, with_session};
pub use events::{LogLevel, StreamEvent};
pub use session::{SessionRegistry, StreamingSession, QUEUE_CAPACITY};
