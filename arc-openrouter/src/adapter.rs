use crate::settings::{strip_routing_prefix, OpenRouterSettings};
use crate::wire::ChatCompletionResponse;
use arc_core::error::CoreError;
use arc_provider::{
    capabilities_for, AnalyzeOptions, AnalysisResponse, AnalysisStatus, ModelCapabilities,
    PromptMode, ProviderAdapter, ProviderError, PuzzleInput, TokenUsage,
};
use async_trait::async_trait;
use serde_json::json;

/// Provider adapter for OpenRouter's OpenAI-compatible `/chat/completions`
/// endpoint, grounded on `llm-kit-openai-compatible`'s
/// settings/client shape. OpenRouter has no native response-chaining and no
/// structured-output contract (capability table), so every call resends the
/// full prompt and relies on the prompt-level JSON instructions alone.
pub struct OpenRouterAdapter {
    settings: OpenRouterSettings,
    client: reqwest::Client,
}

impl OpenRouterAdapter {
    pub fn new(settings: OpenRouterSettings) -> Self {
        Self { settings, client: reqwest::Client::new() }
    }

    fn headers(&self, user_api_key: Option<&str>) -> Result<Vec<(String, String)>, ProviderError> {
        let key = user_api_key
            .map(|k| k.to_string())
            .or_else(|| self.settings.resolved_api_key())
            .ok_or_else(|| ProviderError::Auth {
                provider: "openrouter".into(),
                message: "no API key supplied (userApiKey or OPENROUTER_API_KEY)".into(),
            })?;
        Ok(vec![("Authorization".to_string(), format!("Bearer {key}"))])
    }

    fn build_body(
        &self,
        model_key: &str,
        temperature: f32,
        system_prompt: &str,
        user_prompt: &str,
        options: &AnalyzeOptions,
    ) -> serde_json::Value {
        let mut body = json!({
            "model": strip_routing_prefix(model_key),
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": temperature,
        });

        if let Some(max_tokens) = options.max_output_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }

    fn classify_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
        let provider = "openrouter".to_string();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return ProviderError::Auth { provider, message: body.to_string() };
        }
        if status.as_u16() == 429 {
            return ProviderError::RateLimit { provider, message: body.to_string(), retry_after: None };
        }
        if status.is_server_error() {
            return ProviderError::RateLimit { provider, message: body.to_string(), retry_after: None };
        }
        ProviderError::Protocol { provider, message: format!("HTTP {status}: {body}") }
    }
}

#[async_trait]
impl ProviderAdapter for OpenRouterAdapter {
    fn provider_name(&self) -> &str {
        "openrouter"
    }

    fn capabilities(&self, model_key: &str) -> ModelCapabilities {
        capabilities_for(model_key)
    }

    async fn analyze(
        &self,
        puzzle: &PuzzleInput,
        model_key: &str,
        temperature: f32,
        _prompt_mode: PromptMode,
        system_prompt: &str,
        user_prompt: &str,
        options: &AnalyzeOptions,
    ) -> Result<AnalysisResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.settings.resolved_base_url());

        arc_provider::retry::with_backoff(|| async {
            let body = self.build_body(model_key, temperature, system_prompt, user_prompt, options);
            let headers = self.headers(options.user_api_key.as_deref())?;

            let mut request = self.client.post(&url).json(&body);
            for (key, value) in &headers {
                request = request.header(key, value);
            }

            let response = request
                .send()
                .await
                .map_err(|source| ProviderError::Transport { provider: "openrouter".into(), source })?;

            let status = response.status();
            let raw = response
                .text()
                .await
                .map_err(|source| ProviderError::Transport { provider: "openrouter".into(), source })?;

            if !status.is_success() {
                return Err(Self::classify_error(status, &raw));
            }

            let parsed: ChatCompletionResponse = serde_json::from_str(&raw).map_err(|e| ProviderError::Protocol {
                provider: "openrouter".into(),
                message: format!("could not parse chat completion body: {e}"),
            })?;
            let raw_value: serde_json::Value = serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null);

            let raw_text = parsed.concatenated_text();
            let test_count = puzzle.test.len();

            let parsed_analysis = arc_core::parser::parse_analysis(None, &raw_text, test_count).map_err(|err| {
                match err {
                    CoreError::Parse => ProviderError::Protocol {
                        provider: "openrouter".into(),
                        message: "model output was not valid JSON".into(),
                    },
                    other => ProviderError::Protocol { provider: "openrouter".into(), message: other.to_string() },
                }
            })?;

            let usage = parsed
                .usage
                .as_ref()
                .map(|u| TokenUsage {
                    input_tokens: u.prompt_tokens,
                    output_tokens: u.completion_tokens,
                    reasoning_tokens: 0,
                    total_tokens: u.total_tokens,
                    cost_usd: None,
                })
                .unwrap_or_default();

            Ok(AnalysisResponse {
                raw_text: raw_text.clone(),
                predicted_output: parsed_analysis.predicted_output,
                multi_test_prediction_grids: parsed_analysis.multi_test_prediction_grids,
                pattern_description: parsed_analysis.pattern_description,
                solving_strategy: parsed_analysis.solving_strategy,
                hints: parsed_analysis.hints,
                confidence: parsed_analysis.confidence,
                usage,
                reasoning_log: None,
                reasoning_items: Vec::new(),
                status: if parsed.is_incomplete() { AnalysisStatus::Incomplete } else { AnalysisStatus::Complete },
                incomplete_reason: if parsed.is_incomplete() { Some("length".into()) } else { None },
                provider_response_id: parsed.id.clone(),
                provider_raw_response: raw_value,
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_prefix_is_stripped_before_sending_model() {
        let adapter = OpenRouterAdapter::new(OpenRouterSettings::new().with_api_key("k"));
        let body = adapter.build_body(
            "openrouter/anthropic/claude-3.5-sonnet",
            0.2,
            "sys",
            "user",
            &AnalyzeOptions::default(),
        );
        assert_eq!(body["model"], "anthropic/claude-3.5-sonnet");
    }

    #[test]
    fn missing_api_key_is_auth_error() {
        let adapter = OpenRouterAdapter::new(OpenRouterSettings::new());
        let err = adapter.headers(None).unwrap_err();
        assert!(matches!(err, ProviderError::Auth { .. }));
    }
}
