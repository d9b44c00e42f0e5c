use crate::schema::response_schema;
use crate::settings::GeminiSettings;
use crate::wire::GenerateContentResponse;
use arc_core::error::CoreError;
use arc_provider::{
    capabilities_for, AnalyzeOptions, AnalysisResponse, AnalysisStatus, ModelCapabilities,
    PromptMode, ProviderAdapter, ProviderError, PuzzleInput, TokenUsage,
};
use async_trait::async_trait;
use serde_json::json;

/// Provider adapter for Google's `generateContent` API,
/// grounded on `llm-kit-huggingface`'s per-model-URL client shape. Gemini has
/// no server-side-stored-reasoning continuation, so — like `arc-anthropic` —
/// every call resends the full prompt regardless of `previousResponseId`.
pub struct GeminiAdapter {
    settings: GeminiSettings,
    client: reqwest::Client,
}

impl GeminiAdapter {
    pub fn new(settings: GeminiSettings) -> Self {
        Self { settings, client: reqwest::Client::new() }
    }

    fn resolve_key(&self, user_api_key: Option<&str>) -> Result<String, ProviderError> {
        user_api_key
            .map(|k| k.to_string())
            .or_else(|| self.settings.resolved_api_key())
            .ok_or_else(|| ProviderError::Auth {
                provider: "gemini".into(),
                message: "no API key supplied (userApiKey or GEMINI_API_KEY)".into(),
            })
    }

    fn build_body(
        &self,
        temperature: f32,
        capabilities: &ModelCapabilities,
        system_prompt: &str,
        user_prompt: &str,
        options: &AnalyzeOptions,
        use_schema: bool,
    ) -> serde_json::Value {
        let mut generation_config = serde_json::Map::new();

        if let Some(max_tokens) = options.max_output_tokens {
            generation_config.insert("maxOutputTokens".into(), json!(max_tokens));
        }

        if capabilities.is_reasoning_model {
            generation_config.insert(
                "thinkingConfig".into(),
                json!({ "thinkingBudget": options.max_output_tokens.unwrap_or(8192) / 2 }),
            );
        } else {
            generation_config.insert("temperature".into(), json!(temperature));
        }

        if use_schema {
            generation_config.insert("responseMimeType".into(), json!("application/json"));
            generation_config.insert("responseSchema".into(), response_schema());
        }

        json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": user_prompt }] }],
            "generationConfig": generation_config,
        })
    }

    fn classify_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
        let provider = "gemini".to_string();
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
impl ProviderAdapter for GeminiAdapter {
    fn provider_name(&self) -> &str {
        "gemini"
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
        let use_schema = capabilities.supports_structured_output && !puzzle.is_multi_test();
        let url = self.settings.generate_content_url(model_key);

        arc_provider::retry::with_backoff(|| async {
            let key = self.resolve_key(options.user_api_key.as_deref())?;
            let body = self.build_body(temperature, &capabilities, system_prompt, user_prompt, options, use_schema);

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &key)
                .json(&body)
                .send()
                .await
                .map_err(|source| ProviderError::Transport { provider: "gemini".into(), source })?;

            let status = response.status();
            let raw = response
                .text()
                .await
                .map_err(|source| ProviderError::Transport { provider: "gemini".into(), source })?;

            if !status.is_success() {
                return Err(Self::classify_error(status, &raw));
            }

            let parsed: GenerateContentResponse = serde_json::from_str(&raw).map_err(|e| ProviderError::Protocol {
                provider: "gemini".into(),
                message: format!("could not parse generateContent body: {e}"),
            })?;
            let raw_value: serde_json::Value = serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null);

            let raw_text = parsed.concatenated_text();
            let test_count = puzzle.test.len();

            let structured_output = use_schema
                .then(|| serde_json::from_str::<serde_json::Value>(&raw_text).ok())
                .flatten();

            let parsed_analysis =
                arc_core::parser::parse_analysis(structured_output.as_ref(), &raw_text, test_count).map_err(
                    |err| match err {
                        CoreError::Parse => ProviderError::Protocol {
                            provider: "gemini".into(),
                            message: "model output was not valid JSON".into(),
                        },
                        other => ProviderError::Protocol { provider: "gemini".into(), message: other.to_string() },
                    },
                )?;

            let usage = parsed
                .usage_metadata
                .as_ref()
                .map(|u| TokenUsage {
                    input_tokens: u.prompt_token_count,
                    output_tokens: u.candidates_token_count,
                    reasoning_tokens: u.thoughts_token_count,
                    total_tokens: u.total_token_count,
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
                incomplete_reason: if parsed.is_incomplete() { Some("max_tokens".into()) } else { None },
                provider_response_id: None,
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
    fn uses_schema_only_for_single_test_puzzles() {
        let adapter = GeminiAdapter::new(GeminiSettings::new().with_api_key("k"));
        let caps = capabilities_for("gemini-2.5-pro");
        let body = adapter.build_body(0.2, &caps, "sys", "user", &AnalyzeOptions::default(), true);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn reasoning_models_drop_temperature_for_thinking_budget() {
        let adapter = GeminiAdapter::new(GeminiSettings::new().with_api_key("k"));
        let caps = capabilities_for("gemini-2.5-pro-thinking");
        let body = adapter.build_body(0.2, &caps, "sys", "user", &AnalyzeOptions::default(), false);
        assert!(body["generationConfig"].get("thinkingConfig").is_some());
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn missing_api_key_is_auth_error() {
        let adapter = GeminiAdapter::new(GeminiSettings::new());
        let err = adapter.resolve_key(None).unwrap_err();
        assert!(matches!(err, ProviderError::Auth { .. }));
    }
}
