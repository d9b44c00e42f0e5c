//! Relational persistence for the ARC-AGI research harness.
//!
//! Implements the `ExplanationRepository` and `PuzzleRepository` traits
//! from `arc-core` against Postgres via `sqlx`, plus a handful of
//! concrete, trait-external stores (`arc3_sessions`/`arc3_frames`,
//! `feedback`, `ingestion_runs`) that `arc-server` depends on directly —
//! the repository boundary in `arc-core` only covers what the solver loops
//! themselves need, not every table this crate owns.

mod arc3;
mod codec;
mod error;
mod explanations;
mod feedback;
mod ingestion;
/// Connection pool setup and migration runner.
pub mod pool;
mod puzzles;

pub use arc3::Arc3SessionStore;
pub use explanations::PgExplanationRepository;
pub use feedback::FeedbackStore;
pub use ingestion::IngestionRunStore;
pub use pool::connect;
pub use puzzles::FsPuzzleRepository;
