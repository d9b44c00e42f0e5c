use serde::{Deserialize, Serialize};

/// `reasoningEffort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

/// `reasoningVerbosity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningVerbosity {
    Low,
    Medium,
    High,
}

/// `reasoningSummary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningSummary {
    Auto,
    Detailed,
    None,
}

/// A prior analysis being challenged or refined, injected into the prompt
/// by `debateContext` / `retryContext`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorExplanation {
    pub pattern_description: String,
    pub solving_strategy: String,
    pub hints: Vec<String>,
    pub confidence: u8,
}

/// Per-call configuration passed to every adapter's `analyze` — adapters
/// and prompt assembly should treat this as the closed set of knobs they
/// honor rather than inventing ad hoc ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    pub previous_response_id: Option<String>,
    pub original_explanation: Option<PriorExplanation>,
    pub previous_analysis: Option<PriorExplanation>,
    pub custom_challenge: Option<String>,
    /// Links this analysis to the one it challenges or refines (debate /
    /// discussion modes). Carried straight through to `NewExplanation`;
    /// prompt assembly does not read it, only persistence does.
    pub rebutting_explanation_id: Option<i64>,
    pub reasoning_effort: Option<ReasoningEffort>,
    pub reasoning_verbosity: Option<ReasoningVerbosity>,
    pub reasoning_summary: Option<ReasoningSummary>,
    pub max_output_tokens: Option<u32>,
    pub stream_session_id: Option<String>,
    pub user_api_key: Option<String>,
}
