use serde::{Deserialize, Serialize};

/// Which system-prompt template and continuation rules apply to a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    Solver,
    Explanation,
    Debate,
    Discussion,
    Alien,
    Gepa,
    Custom,
}

impl PromptMode {
    /// Whether this mode may use `previous_response_id` continuation at all.
    pub fn allows_continuation(self) -> bool {
        !matches!(self, PromptMode::Gepa)
    }

    /// Whether responses in this mode must render with the 16-symbol emoji
    /// palette instead of integers.
    pub fn requires_emojis(self) -> bool {
        matches!(self, PromptMode::Alien)
    }
}

/// Whether a call is opening a fresh chain or continuing one via
/// `previous_response_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Initial,
    Continuation,
}
