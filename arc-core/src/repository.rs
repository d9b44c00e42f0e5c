use crate::analysis::{Explanation, NewExplanation};
use crate::error::CoreError;
use crate::puzzle::Puzzle;
use async_trait::async_trait;

/// Persistence boundary the orchestrator and solvers depend on.
/// Implemented by `arc-storage`; kept in this crate (rather than the other
/// way around) so `arc-core` has no dependency on a concrete database
/// driver, mirroring the separation `llm_kit_storage` draws between its
/// `ConversationStorage` trait and its filesystem implementation.
#[async_trait]
pub trait ExplanationRepository: Send + Sync {
    /// Idempotent on `(puzzle_id, model_key, provider_response_id)` — saving
    /// the same triple twice returns the existing row rather than inserting
    /// a duplicate.
    async fn save_explanation(&self, new: NewExplanation) -> Result<Explanation, CoreError>;

    async fn get_explanation(&self, id: i64) -> Result<Option<Explanation>, CoreError>;

    async fn list_for_puzzle(&self, puzzle_id: &str) -> Result<Vec<Explanation>, CoreError>;

    /// Used for provider-mismatch detection: looks up which
    /// provider family produced a given response id before a continuation
    /// is allowed to use it.
    async fn find_by_provider_response_id(&self, id: &str) -> Result<Option<Explanation>, CoreError>;
}

/// Puzzle loading boundary, separated from [`ExplanationRepository`] because
/// puzzles live on disk (metadata only; grids live in flat files) while
/// explanations live in the relational store.
#[async_trait]
pub trait PuzzleRepository: Send + Sync {
    async fn load(&self, puzzle_id: &str) -> Result<Puzzle, CoreError>;
}
