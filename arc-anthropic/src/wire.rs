//! `/v1/messages` wire types: `{model, system, messages, thinking?,
//! max_tokens}`.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MessagesApiResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<MessagesUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    Thinking { thinking: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize, Default)]
pub struct MessagesUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

impl MessagesApiResponse {
    /// Every `text` content block, in order — Anthropic is the provider
    /// this concatenation step exists for.
    pub fn text_blocks(&self) -> Vec<String> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn thinking_blocks(&self) -> Vec<String> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Thinking { thinking } => Some(thinking.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn is_incomplete(&self) -> bool {
        self.stop_reason.as_deref() == Some("max_tokens")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_thinking_from_text_blocks() {
        let raw = serde_json::json!({
            "id": "msg_01",
            "content": [
                {"type": "thinking", "thinking": "reasoning..."},
                {"type": "text", "text": "{\"predictedOutput\":[[1]]}"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 20, "output_tokens": 8}
        });
        let resp: MessagesApiResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.text_blocks(), vec!["{\"predictedOutput\":[[1]]}".to_string()]);
        assert_eq!(resp.thinking_blocks(), vec!["reasoning...".to_string()]);
        assert!(!resp.is_incomplete());
    }
}
