use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// Token usage and computed cost for one analysis call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub reasoning_tokens: u32,
    pub total_tokens: u32,
    /// USD, computed from the pricing table in `arc-core::pricing` —
    /// adapters leave this as `None` and the orchestrator fills it in once
    /// token counts are known.
    pub cost_usd: Option<f64>,
}

/// Whether the provider considered its own output complete, or cut it off
/// (token budget, length cap) before it reached a natural stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Complete,
    Incomplete,
}

/// The normalized result of one `analyze` call, before correctness
/// validation or persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// The model's raw output text before any JSON extraction — always
    /// populated regardless of prompt mode. The default (solver/debate/etc)
    /// pipeline parses this into the structured fields below; the Grover
    /// solver (`arc-grover`) reads it directly to pull fenced Python blocks
    /// out of a response that was never meant to be JSON at all.
    pub raw_text: String,
    pub predicted_output: Option<Grid>,
    pub multi_test_prediction_grids: Option<Vec<Option<Grid>>>,
    pub pattern_description: String,
    pub solving_strategy: String,
    pub hints: Vec<String>,
    pub confidence: u8,
    pub usage: TokenUsage,
    pub reasoning_log: Option<String>,
    pub reasoning_items: Vec<String>,
    pub status: AnalysisStatus,
    pub incomplete_reason: Option<String>,
    /// Opaque id returned by the provider, threaded by the orchestrator into
    /// the `providerResponseId` column. Dropping it here silently breaks
    /// every downstream continuation for this chain.
    pub provider_response_id: Option<String>,
    pub provider_raw_response: serde_json::Value,
}
