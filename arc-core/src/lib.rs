//! Puzzle model, prompt assembly, response parsing, correctness validation,
//! and orchestration for the ARC-AGI research harness.
//!
//! This crate sits between the provider adapters (`arc-provider` and its
//! concrete implementations) and the HTTP surface (`arc-server`): it owns
//! the domain model (`Puzzle`, `Explanation`), the prompt assembly state
//! machine, the streaming bus, and the single-shot orchestration pipeline.
//! Solver loops (`arc-grover`, `arc-arc3`) and storage (`arc-storage`)
//! depend on the types defined here rather than duplicating them.

/// Analysis/Explanation domain model and conversation-chain reconstruction.
pub mod analysis;
/// Orchestration-layer error taxonomy.
pub mod error;
/// Response Parser: extracts normalized analyses from raw
/// provider output.
pub mod parser;
/// Cost table supplementing `TokenUsage.cost_usd`.
pub mod pricing;
/// Prompt Assembly.
pub mod prompt;
/// Puzzle domain model and on-disk loader.
pub mod puzzle;
/// Persistence boundary traits, implemented by `arc-storage`.
pub mod repository;
/// Streaming Bus.
pub mod stream;
/// Correctness Validator.
pub mod validator;

/// Analysis Orchestrator: the single-shot analyze-one-puzzle pipeline.
pub mod orchestrator;

pub use analysis::{ChainNode, Explanation, GroverIteration, GroverProgramResult, NewExplanation};
pub use error::{CoreError, SandboxErrorKind};
pub use orchestrator::{analyze_once, AnalyzeRequest};
pub use puzzle::{Puzzle, PuzzleLoadError};
pub use repository::{ExplanationRepository, PuzzleRepository};
pub use validator::CorrectnessVerdict;
