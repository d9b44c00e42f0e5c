use crate::settings::AnthropicSettings;
use crate::wire::MessagesApiResponse;
use arc_core::error::CoreError;
use arc_core::parser::concat_text_blocks;
use arc_provider::{
    capabilities_for, AnalyzeOptions, AnalysisResponse, AnalysisStatus, ModelCapabilities,
    PromptMode, ProviderAdapter, ProviderError, PuzzleInput, TokenUsage,
};
use async_trait::async_trait;
use serde_json::json;

const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Provider adapter for Anthropic's Messages API, grounded on
/// `llm-kit-anthropic`'s client/settings shape. Anthropic has no
/// server-side-stored-reasoning continuation, so every call — initial or
/// refinement — resends the full prompt.
pub struct AnthropicAdapter {
    settings: AnthropicSettings,
    client: reqwest::Client,
}

impl AnthropicAdapter {
    pub fn new(settings: AnthropicSettings) -> Self {
        Self { settings, client: reqwest::Client::new() }
    }

    fn headers(&self, user_api_key: Option<&str>) -> Result<Vec<(String, String)>, ProviderError> {
        let key = user_api_key
            .map(|k| k.to_string())
            .or_else(|| self.settings.resolved_api_key())
            .ok_or_else(|| ProviderError::Auth {
                provider: "anthropic".into(),
                message: "no API key supplied (userApiKey or ANTHROPIC_API_KEY)".into(),
            })?;
        Ok(vec![
            ("x-api-key".to_string(), key),
            ("anthropic-version".to_string(), self.settings.resolved_version()),
        ])
    }

    fn build_body(
        &self,
        model_key: &str,
        temperature: f32,
        capabilities: &ModelCapabilities,
        system_prompt: &str,
        user_prompt: &str,
        options: &AnalyzeOptions,
    ) -> serde_json::Value {
        let mut body = json!({
            "model": model_key,
            "system": system_prompt,
            "messages": [{ "role": "user", "content": user_prompt }],
            "max_tokens": options.max_output_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        });

        if capabilities.is_reasoning_model {
            body["thinking"] = json!({
                "type": "enabled",
                "budget_tokens": (options.max_output_tokens.unwrap_or(DEFAULT_MAX_TOKENS) / 2).max(1024),
            });
        } else {
            body["temperature"] = json!(temperature);
        }

        body
    }

    fn classify_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
        let provider = "anthropic".to_string();
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
impl ProviderAdapter for AnthropicAdapter {
    fn provider_name(&self) -> &str {
        "anthropic"
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
        let capabilities = capabilities_for(model_key);
        let url = format!("{}/messages", self.settings.resolved_base_url());

        arc_provider::retry::with_backoff(|| async {
            let body = self.build_body(model_key, temperature, &capabilities, system_prompt, user_prompt, options);
            let headers = self.headers(options.user_api_key.as_deref())?;

            let mut request = self.client.post(&url).json(&body);
            for (key, value) in &headers {
                request = request.header(key, value);
            }

            let response = request.send().await.map_err(|source| ProviderError::Transport {
                provider: "anthropic".into(),
                source,
            })?;

            let status = response.status();
            let raw = response.text().await.map_err(|source| ProviderError::Transport {
                provider: "anthropic".into(),
                source,
            })?;

            if !status.is_success() {
                return Err(Self::classify_error(status, &raw));
            }

            let parsed: MessagesApiResponse = serde_json::from_str(&raw).map_err(|e| ProviderError::Protocol {
                provider: "anthropic".into(),
                message: format!("could not parse Messages API body: {e}"),
            })?;
            let raw_value: serde_json::Value = serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null);

            let raw_text = concat_text_blocks(&parsed.text_blocks());
            let test_count = puzzle.test.len();

            let parsed_analysis = arc_core::parser::parse_analysis(None, &raw_text, test_count).map_err(|err| {
                match err {
                    CoreError::Parse => ProviderError::Protocol {
                        provider: "anthropic".into(),
                        message: "model output was not valid JSON".into(),
                    },
                    other => ProviderError::Protocol { provider: "anthropic".into(), message: other.to_string() },
                }
            })?;

            let usage = parsed
                .usage
                .as_ref()
                .map(|u| TokenUsage {
                    input_tokens: u.input_tokens,
                    output_tokens: u.output_tokens,
                    reasoning_tokens: 0,
                    total_tokens: u.input_tokens + u.output_tokens,
                    cost_usd: None,
                })
                .unwrap_or_default();

            let thinking = parsed.thinking_blocks();

            Ok(AnalysisResponse {
                raw_text: raw_text.clone(),
                predicted_output: parsed_analysis.predicted_output,
                multi_test_prediction_grids: parsed_analysis.multi_test_prediction_grids,
                pattern_description: parsed_analysis.pattern_description,
                solving_strategy: parsed_analysis.solving_strategy,
                hints: parsed_analysis.hints,
                confidence: parsed_analysis.confidence,
                usage,
                reasoning_log: if thinking.is_empty() { None } else { Some(thinking.join("\n")) },
                reasoning_items: thinking,
                status: if parsed.is_incomplete() { AnalysisStatus::Incomplete } else { AnalysisStatus::Complete },
                incomplete_reason: if parsed.is_incomplete() { Some("max_tokens".into()) } else { None },
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
    fn reasoning_models_enable_thinking_instead_of_temperature() {
        let adapter = AnthropicAdapter::new(AnthropicSettings::new().with_api_key("k"));
        let caps = capabilities_for("claude-opus-4-thinking");
        let body = adapter.build_body("claude-opus-4-thinking", 0.2, &caps, "sys", "user", &AnalyzeOptions::default());
        assert!(body.get("thinking").is_some());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn non_reasoning_models_use_temperature() {
        let adapter = AnthropicAdapter::new(AnthropicSettings::new().with_api_key("k"));
        let caps = capabilities_for("claude-haiku");
        let body = adapter.build_body("claude-haiku", 0.7, &caps, "sys", "user", &AnalyzeOptions::default());
        assert_eq!(body["temperature"], 0.7);
    }

    #[test]
    fn always_resends_full_system_prompt_even_with_previous_response_id() {
        let adapter = AnthropicAdapter::new(AnthropicSettings::new().with_api_key("k"));
        let caps = capabilities_for("claude-haiku");
        let options = AnalyzeOptions { previous_response_id: Some("resp_1".into()), ..Default::default() };
        let body = adapter.build_body("claude-haiku", 0.2, &caps, "sys", "user", &options);
        assert_eq!(body["system"], "sys");
    }
}
