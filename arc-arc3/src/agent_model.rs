use arc_provider::ProviderError;
use serde::Deserialize;
use serde_json::{json, Value};

/// One function the agent loop offered the model this turn, declared in the
/// Responses API `tools` array shape.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// One function call the model made, extracted from the Responses API
/// `output` array.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCallItem {
    pub call_id: String,
    pub name: String,
    #[serde(deserialize_with = "deserialize_json_string")]
    pub arguments: Value,
}

fn deserialize_json_string<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(serde_json::from_str(&raw).unwrap_or(Value::Null))
}

#[derive(Debug, Clone, Default)]
pub struct ModelTurn {
    pub reasoning_summary: Option<String>,
    pub function_calls: Vec<FunctionCallItem>,
    pub response_id: Option<String>,
}

/// Minimal tool-calling client against the OpenAI/Grok Responses API, shaped
/// after `arc-openai`'s adapter — duplicated here rather than depending on
/// `arc-openai` because the ARC-3 agent loop needs `tools`/
/// `function_call_output` turns the puzzle-solving `ProviderAdapter` trait
/// has no room for.
pub struct AgentModelClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AgentModelClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), api_key: api_key.into(), client: reqwest::Client::new() }
    }

    /// Builds the `/v1/responses` request body. On the first call, sends
    /// `system_prompt` plus the user message; on a continuation
    /// (`previous_response_id` set), sends only the new input item, matching
    /// the Responses API chaining contract every other adapter in this
    /// workspace follows.
    fn build_body(
        &self,
        model: &str,
        system_prompt: &str,
        input_text: &str,
        tools: &[ToolDefinition],
        previous_response_id: Option<&str>,
        function_call_output: Option<(&str, &str)>,
    ) -> Value {
        let mut body = json!({
            "model": model,
            "store": true,
            "tools": tools.iter().map(|t| json!({
                "type": "function",
                "name": t.name,
                "description": t.description,
                "parameters": t.parameters,
            })).collect::<Vec<_>>(),
        });

        if let Some(prev) = previous_response_id {
            body["previous_response_id"] = json!(prev);
            let input = if let Some((call_id, output)) = function_call_output {
                json!([{ "type": "function_call_output", "call_id": call_id, "output": output }])
            } else {
                json!([{ "role": "user", "content": input_text }])
            };
            body["input"] = input;
        } else {
            body["input"] = json!([
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": input_text },
            ]);
        }

        body
    }

    /// Sends one turn and parses the model's reasoning summary and any
    /// function calls out of the response.
    pub async fn send_turn(
        &self,
        model: &str,
        system_prompt: &str,
        input_text: &str,
        tools: &[ToolDefinition],
        previous_response_id: Option<&str>,
        function_call_output: Option<(&str, &str)>,
    ) -> Result<ModelTurn, ProviderError> {
        let body = self.build_body(model, system_prompt, input_text, tools, previous_response_id, function_call_output);

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| ProviderError::Transport { provider: "arc3-agent".into(), source })?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|source| ProviderError::Transport { provider: "arc3-agent".into(), source })?;

        if !status.is_success() {
            return Err(ProviderError::Protocol { provider: "arc3-agent".into(), message: format!("HTTP {status}: {raw}") });
        }

        let parsed: Value = serde_json::from_str(&raw)
            .map_err(|e| ProviderError::Protocol { provider: "arc3-agent".into(), message: format!("could not parse agent response: {e}") })?;

        let response_id = parsed.get("id").and_then(Value::as_str).map(String::from);
        let mut reasoning_summary = None;
        let mut function_calls = Vec::new();

        if let Some(output) = parsed.get("output").and_then(Value::as_array) {
            for item in output {
                match item.get("type").and_then(Value::as_str) {
                    Some("reasoning") => {
                        if let Some(summary) = item.get("summary").and_then(Value::as_array) {
                            let text: String = summary
                                .iter()
                                .filter_map(|s| s.get("text").and_then(Value::as_str))
                                .collect::<Vec<_>>()
                                .join(" ");
                            if !text.is_empty() {
                                reasoning_summary = Some(text);
                            }
                        }
                    }
                    Some("function_call") => {
                        if let Ok(call) = serde_json::from_value::<FunctionCallItem>(item.clone()) {
                            function_calls.push(call);
                        }
                    }
                    _ => {}
                }
            }
        }

        Ok(ModelTurn { reasoning_summary, function_calls, response_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tool() -> ToolDefinition {
        ToolDefinition { name: "action1".into(), description: "move".into(), parameters: json!({"type": "object"}) }
    }

    #[test]
    fn initial_call_sends_system_and_user_messages() {
        let client = AgentModelClient::new("https://api.openai.com/v1", "k");
        let body = client.build_body("gpt-5", "sys", "user", &[sample_tool()], None, None);
        let input = body["input"].as_array().unwrap();
        assert_eq!(input.len(), 2);
        assert_eq!(input[0]["role"], "system");
    }

    #[test]
    fn continuation_sends_function_call_output_only() {
        let client = AgentModelClient::new("https://api.openai.com/v1", "k");
        let body = client.build_body("gpt-5", "sys", "user", &[sample_tool()], Some("resp_1"), Some(("call_1", "{}")));
        let input = body["input"].as_array().unwrap();
        assert_eq!(input.len(), 1);
        assert_eq!(input[0]["type"], "function_call_output");
        assert_eq!(body["previous_response_id"], "resp_1");
    }
}
