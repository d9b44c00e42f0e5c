use arc_provider::{ConversationState, PromptMode, ProviderFamily};

/// The inputs prompt assembly is a pure function of: mode,
/// conversation-state, provider-family, puzzle shape, and which optional
/// context blocks are present. Two calls with an equal `PromptContext`
/// (and equal puzzle/options content) produce byte-identical prompts.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext {
    pub mode: PromptMode,
    pub state: ConversationState,
    pub provider_family: ProviderFamily,
    pub is_multi_test: bool,
    pub has_original_explanation: bool,
    pub has_previous_analysis: bool,
    pub emoji_mode: bool,
}

impl PromptContext {
    /// A provider family with no native response-id chaining must always
    /// receive the full initial pattern, regardless of `state`.
    pub fn effective_state(&self) -> ConversationState {
        if !self.provider_family.supports_response_chaining() {
            ConversationState::Initial
        } else {
            self.state
        }
    }
}
