use crate::schema::strict_response_schema;
use crate::settings::OpenAiSettings;
use crate::wire::ResponsesApiResponse;
use arc_core::error::CoreError;
use arc_provider::{
    capabilities_for, AnalyzeOptions, AnalysisResponse, AnalysisStatus, ModelCapabilities,
    PromptMode, ProviderAdapter, ProviderError, PuzzleInput, TokenUsage,
};
use async_trait::async_trait;
use serde_json::json;

/// Provider adapter for OpenAI's Responses API, grounded on
/// `llm-kit-openai`'s chat language model but specialized to the single
/// `analyze` verb and the continuation contract this harness needs.
pub struct OpenAiAdapter {
    settings: OpenAiSettings,
    client: reqwest::Client,
}

impl OpenAiAdapter {
    pub fn new(settings: OpenAiSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }

    fn headers(&self, user_api_key: Option<&str>) -> Result<Vec<(String, String)>, ProviderError> {
        let key = user_api_key
            .map(|k| k.to_string())
            .or_else(|| self.settings.resolved_api_key())
            .ok_or_else(|| ProviderError::Auth {
                provider: "openai".into(),
                message: "no API key supplied (userApiKey or OPENAI_API_KEY)".into(),
            })?;

        let mut headers = vec![("Authorization".to_string(), format!("Bearer {key}"))];
        if let Some(ref org) = self.settings.organization {
            headers.push(("OpenAI-Organization".to_string(), org.clone()));
        }
        if let Some(ref proj) = self.settings.project {
            headers.push(("OpenAI-Project".to_string(), proj.clone()));
        }
        if let Some(ref extra) = self.settings.headers {
            headers.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Ok(headers)
    }

    fn build_body(
        &self,
        model_key: &str,
        temperature: f32,
        capabilities: &ModelCapabilities,
        system_prompt: &str,
        user_prompt: &str,
        options: &AnalyzeOptions,
        use_schema: bool,
    ) -> serde_json::Value {
        let continuing = options.previous_response_id.is_some();

        let input = if continuing {
            json!([{ "role": "user", "content": user_prompt }])
        } else {
            json!([
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ])
        };

        let mut body = json!({
            "model": model_key,
            "input": input,
            "store": true,
        });

        if let Some(ref prev) = options.previous_response_id {
            body["previous_response_id"] = json!(prev);
        }
        if !capabilities.is_reasoning_model {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = options.max_output_tokens {
            body["max_output_tokens"] = json!(max_tokens);
        }

        let mut text = serde_json::Map::new();
        if use_schema {
            text.insert(
                "format".into(),
                json!({
                    "type": "json_schema",
                    "name": "arc_analysis",
                    "schema": strict_response_schema(),
                    "strict": true,
                }),
            );
        }
        if let Some(verbosity) = options.reasoning_verbosity {
            text.insert("verbosity".into(), json!(verbosity));
        }
        if !text.is_empty() {
            body["text"] = serde_json::Value::Object(text);
        }

        if capabilities.is_reasoning_model {
            let mut reasoning = serde_json::Map::new();
            if let Some(effort) = options.reasoning_effort {
                reasoning.insert("effort".into(), json!(effort));
            }
            if let Some(summary) = options.reasoning_summary {
                reasoning.insert("summary".into(), json!(summary));
            }
            if !reasoning.is_empty() {
                body["reasoning"] = serde_json::Value::Object(reasoning);
            }
        }

        body
    }

    fn classify_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
        let provider = "openai".to_string();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return ProviderError::Auth { provider, message: body.to_string() };
        }
        if status.as_u16() == 429 {
            return ProviderError::RateLimit { provider, message: body.to_string(), retry_after: None };
        }
        if status.is_server_error() {
            return ProviderError::RateLimit { provider, message: body.to_string(), retry_after: None };
        }
        ProviderError::Protocol {
            provider,
            message: format!("HTTP {status}: {body}"),
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn provider_name(&self) -> &str {
        "openai"
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
        let url = format!("{}/responses", self.settings.resolved_base_url());

        arc_provider::retry::with_backoff(|| async {
            let body = self.build_body(
                model_key,
                temperature,
                &capabilities,
                system_prompt,
                user_prompt,
                options,
                use_schema,
            );
            let headers = self.headers(options.user_api_key.as_deref())?;

            let mut request = self.client.post(&url).json(&body);
            for (key, value) in &headers {
                request = request.header(key, value);
            }

            let response = request.send().await.map_err(|source| ProviderError::Transport {
                provider: "openai".into(),
                source,
            })?;

            let status = response.status();
            let raw = response.text().await.map_err(|source| ProviderError::Transport {
                provider: "openai".into(),
                source,
            })?;

            if !status.is_success() {
                return Err(Self::classify_error(status, &raw));
            }

            let parsed: ResponsesApiResponse = serde_json::from_str(&raw).map_err(|e| ProviderError::Protocol {
                provider: "openai".into(),
                message: format!("could not parse Responses API body: {e}"),
            })?;

            let raw_value: serde_json::Value = serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null);
            let raw_text = parsed.concatenated_text();
            let test_count = puzzle.test.len();

            let structured_output = if use_schema {
                serde_json::from_str::<serde_json::Value>(&raw_text).ok()
            } else {
                None
            };

            let parsed_analysis = arc_core::parser::parse_analysis(
                structured_output.as_ref(),
                &raw_text,
                test_count,
            )
            .map_err(|err| match err {
                CoreError::Parse => ProviderError::Protocol {
                    provider: "openai".into(),
                    message: "model output was not valid JSON".into(),
                },
                other => ProviderError::Protocol {
                    provider: "openai".into(),
                    message: other.to_string(),
                },
            })?;

            let usage = parsed
                .usage
                .as_ref()
                .map(|u| TokenUsage {
                    input_tokens: u.input_tokens,
                    output_tokens: u.output_tokens,
                    reasoning_tokens: u
                        .output_tokens_details
                        .as_ref()
                        .map(|d| d.reasoning_tokens)
                        .unwrap_or(0),
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
                reasoning_log: parsed.reasoning_summary_text(),
                reasoning_items: parsed.reasoning_items(),
                status: if parsed.is_incomplete() { AnalysisStatus::Incomplete } else { AnalysisStatus::Complete },
                incomplete_reason: parsed.incomplete_details.as_ref().and_then(|d| d.reason.clone()),
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
    fn uses_schema_only_for_single_test_puzzles() {
        let adapter = OpenAiAdapter::new(OpenAiSettings::new().with_api_key("k"));
        let caps = capabilities_for("gpt-5-2025-08-07");
        let body = adapter.build_body(
            "gpt-5-2025-08-07",
            0.2,
            &caps,
            "sys",
            "user",
            &AnalyzeOptions::default(),
            true,
        );
        assert_eq!(body["text"]["format"]["type"], "json_schema");
    }

    #[test]
    fn continuation_omits_system_message() {
        let adapter = OpenAiAdapter::new(OpenAiSettings::new().with_api_key("k"));
        let caps = capabilities_for("gpt-5-2025-08-07");
        let options = AnalyzeOptions {
            previous_response_id: Some("resp_abc".into()),
            ..Default::default()
        };
        let body = adapter.build_body("gpt-5-2025-08-07", 0.2, &caps, "sys", "user", &options, false);
        let input = body["input"].as_array().unwrap();
        assert_eq!(input.len(), 1);
        assert_eq!(input[0]["role"], "user");
        assert_eq!(body["previous_response_id"], "resp_abc");
    }

    #[test]
    fn reasoning_models_drop_temperature() {
        let adapter = OpenAiAdapter::new(OpenAiSettings::new().with_api_key("k"));
        let caps = capabilities_for("o3-mini");
        let body = adapter.build_body("o3-mini", 0.2, &caps, "sys", "user", &AnalyzeOptions::default(), false);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn missing_api_key_is_auth_error() {
        let adapter = OpenAiAdapter::new(OpenAiSettings::new());
        unsafe { std::env::remove_var("OPENAI_API_KEY") };
        let err = adapter.headers(None).unwrap_err();
        assert!(matches!(err, ProviderError::Auth { .. }));
    }
}
