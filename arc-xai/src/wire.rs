//! `/v1/responses` wire types for Grok — same envelope shape as
//! OpenAI's Responses API, duplicated here rather than shared so this
//! adapter has no compile-time dependency on `arc-openai` (each provider
//! adapter is an independent crate, one-crate-per-provider).

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
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputTokensDetails {
    #[serde(default)]
    pub reasoning_tokens: u32,
}

impl ResponsesApiResponse {
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
            "id": "resp_xai_1",
            "status": "completed",
            "output": [
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": "{\"predictedOutput\":[[1]],\"confidence\":50}"}
                ]}
            ],
        });
        let resp: ResponsesApiResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.concatenated_text(), "{\"predictedOutput\":[[1]],\"confidence\":50}");
    }
}
