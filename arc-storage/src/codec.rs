use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Encodes a unit-like enum (`PromptMode`, `ReasoningEffort`, ...) the same
/// way its `#[serde(rename_all = "lowercase")]` impl would render it as a
/// bare string, for storage in a `TEXT` column.
pub(crate) fn enum_to_text<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(Value::String(s)) => s,
        other => panic!("enum_to_text: expected a string-serializable enum, got {other:?}"),
    }
}

pub(crate) fn enum_to_text_opt<T: Serialize>(value: &Option<T>) -> Option<String> {
    value.as_ref().map(enum_to_text)
}

pub(crate) fn text_to_enum<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::String(text.to_string()))
}

pub(crate) fn text_to_enum_opt<T: DeserializeOwned>(text: Option<String>) -> Result<Option<T>, serde_json::Error> {
    text.map(|t| text_to_enum(&t)).transpose()
}

/// Encodes any JSON-serializable value to its `TEXT`-column representation.
pub(crate) fn json_to_text<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

pub(crate) fn text_to_json<T: DeserializeOwned + Default>(text: &str) -> T {
    serde_json::from_str(text).unwrap_or_default()
}

pub(crate) fn text_to_json_opt<T: DeserializeOwned>(text: Option<String>) -> Option<T> {
    text.and_then(|t| serde_json::from_str(&t).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc_provider::PromptMode;

    #[test]
    fn round_trips_prompt_mode_through_text() {
        let text = enum_to_text(&PromptMode::Discussion);
        assert_eq!(text, "discussion");
        let back: PromptMode = text_to_enum(&text).unwrap();
        assert_eq!(back, PromptMode::Discussion);
    }
}
