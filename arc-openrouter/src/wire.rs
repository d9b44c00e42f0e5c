//! `/chat/completions` wire types, shaped after
//! `llm-kit-openai-compatible::chat::api_types`.

use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

impl ChatCompletionResponse {
    pub fn concatenated_text(&self) -> String {
        self.choices.first().and_then(|c| c.message.content.clone()).unwrap_or_default()
    }

    pub fn is_incomplete(&self) -> bool {
        self.choices.first().and_then(|c| c.finish_reason.as_deref()) == Some("length")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice_content() {
        let raw = serde_json::json!({
            "id": "gen-1",
            "choices": [{"message": {"content": "hello"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
        });
        let resp: ChatCompletionResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.concatenated_text(), "hello");
        assert!(!resp.is_incomplete());
    }
}
