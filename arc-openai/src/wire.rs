//! `/v1/responses` wire types.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ResponsesApiResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub incomplete_details: Option<IncompleteDetails>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
    #[serde(default)]
    pub usage: Option<ResponsesUsage>,
}

#[derive(Debug, Deserialize)]
pub struct IncompleteDetails {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<ContentBlock>,
    },
    Reasoning {
        #[serde(default)]
        summary: Vec<SummaryBlock>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    OutputText { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct SummaryBlock {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ResponsesUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
    #[serde(default)]
    pub output_tokens_details: Option<OutputTokensDetails>,
    #[serde(default)]
    pub input_tokens_details: Option<InputTokensDetails>,
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputTokensDetails {
    #[serde(default)]
    pub reasoning_tokens: u32,
}

#[derive(Debug, Deserialize, Default)]
pub struct InputTokensDetails {
    #[serde(default)]
    pub cached_tokens: u32,
}

impl ResponsesApiResponse {
    /// Concatenates every `output_text` content block across all `message`
    /// output items, in order — the same idea as Anthropic's content-block
    /// concatenation, applied to this provider's shape.
    pub fn concatenated_text(&self) -> String {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                _ => None,
            })
            .flatten()
            .filter_map(|block| match block {
                ContentBlock::OutputText { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Individual reasoning summary text blocks, in order.
    pub fn reasoning_items(&self) -> Vec<String> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Reasoning { summary } => Some(summary),
                _ => None,
            })
            .flatten()
            .filter_map(|block| block.text.clone())
            .collect()
    }

    /// Concatenates reasoning summary text, if the model returned any.
    pub fn reasoning_summary_text(&self) -> Option<String> {
        let parts = self.reasoning_items();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }

    pub fn is_incomplete(&self) -> bool {
        self.status.as_deref() == Some("incomplete")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_message_text_blocks() {
        let raw = serde_json::json!({
            "id": "resp_abc",
            "status": "completed",
            "output": [
                {"type": "reasoning", "summary": [{"type": "summary_text", "text": "thinking..."}]},
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": "{\"predictedOutput\":[[1]]}"}
                ]}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5, "total_tokens": 15}
        });
        let resp: ResponsesApiResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.concatenated_text(), "{\"predictedOutput\":[[1]]}");
        assert_eq!(resp.reasoning_summary_text(), Some("thinking...".to_string()));
        assert!(!resp.is_incomplete());
    }

    #[test]
    fn unknown_output_item_types_are_ignored() {
        let raw = serde_json::json!({
            "id": "resp_abc",
            "status": "incomplete",
            "incomplete_details": {"reason": "max_output_tokens"},
            "output": [{"type": "function_call", "call_id": "x"}],
        });
        let resp: ResponsesApiResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.concatenated_text(), "");
        assert!(resp.is_incomplete());
    }
}
