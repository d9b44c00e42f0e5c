//! Provider adapter trait and shared types for the ARC-AGI research harness.
//!
//! This crate defines the contract every LLM provider adapter must
//! implement: a single `analyze` verb, a consolidated model-capability
//! table, and the error taxonomy adapters raise. Concrete adapters
//! (`arc-openai`, `arc-xai`, `arc-anthropic`, `arc-gemini`, `arc-openrouter`)
//! depend on this crate the way `llm-kit-openai` depends on
//! `llm-kit-provider`.

/// Provider adapter trait.
pub mod adapter;
/// Consolidated model-capability resolution.
pub mod capability;
/// Provider error taxonomy.
pub mod error;
/// 2D integer grid type and sanitization.
pub mod grid;
/// The `options` object honored by every adapter call.
pub mod options;
/// Mode / conversation-state types consumed by prompt assembly.
pub mod prompt_mode;
/// Minimal puzzle shape passed into adapters.
pub mod puzzle_input;
/// Normalized analysis result returned by every adapter.
pub mod response;
/// Shared exponential-backoff retry helper.
pub mod retry;

pub use adapter::ProviderAdapter;
pub use capability::{ModelCapabilities, ProviderFamily, capabilities_for};
pub use error::ProviderError;
pub use grid::Grid;
pub use options::{AnalyzeOptions, PriorExplanation, ReasoningEffort, ReasoningSummary, ReasoningVerbosity};
pub use prompt_mode::{ConversationState, PromptMode};
pub use puzzle_input::{PuzzleInput, TestCase, TrainingPair};
pub use response::{AnalysisResponse, AnalysisStatus, TokenUsage};
