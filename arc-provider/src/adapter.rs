use crate::capability::ModelCapabilities;
use crate::error::ProviderError;
use crate::options::AnalyzeOptions;
use crate::prompt_mode::PromptMode;
use crate::puzzle_input::PuzzleInput;
use crate::response::AnalysisResponse;
use async_trait::async_trait;

/// Implemented once per provider family: OpenAI Responses, xAI
/// Grok Responses, Anthropic Messages, Gemini, OpenRouter.
///
/// Mirrors `llm_kit_provider::LanguageModel` in shape — `provider()` /
/// `model_id()`-style identity plus one verb (`analyze` in place of
/// `do_generate`/`do_stream`) — but is specialized to the ARC-AGI analysis
/// contract rather than a general chat completion.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Name of the provider for logging purposes.
    fn provider_name(&self) -> &str;

    /// Capability facts for a given model key, consulted by prompt assembly
    /// before it builds a request for this adapter.
    fn capabilities(&self, model_key: &str) -> ModelCapabilities;

    /// Run one analysis call.
    ///
    /// Implementations MUST uphold the continuation contract:
    /// when `options.previous_response_id` is set and this provider supports
    /// response chaining, send only the new user message and set
    /// `previous_response_id` on the wire request; otherwise send the full
    /// prompt. They MUST also return the provider's response id in
    /// `AnalysisResponse::provider_response_id` whenever the wire response
    /// carries one — silently dropping it breaks all downstream chaining.
    async fn analyze(
        &self,
        puzzle: &PuzzleInput,
        model_key: &str,
        temperature: f32,
        prompt_mode: PromptMode,
        system_prompt: &str,
        user_prompt: &str,
        options: &AnalyzeOptions,
    ) -> Result<AnalysisResponse, ProviderError>;
}
