use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical ARC-3 action tokens. The remote API accepts and
/// returns these both as integers (0=RESET, 1..7=ACTION1..7) and as strings;
/// everything past the wire boundary works in this canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    Reset,
    Action1,
    Action2,
    Action3,
    Action4,
    Action5,
    Action6,
    Action7,
}

impl GameAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Reset => "RESET",
            GameAction::Action1 => "ACTION1",
            GameAction::Action2 => "ACTION2",
            GameAction::Action3 => "ACTION3",
            GameAction::Action4 => "ACTION4",
            GameAction::Action5 => "ACTION5",
            GameAction::Action6 => "ACTION6",
            GameAction::Action7 => "ACTION7",
        }
    }

    fn from_index(index: u64) -> Option<Self> {
        match index {
            0 => Some(GameAction::Reset),
            1 => Some(GameAction::Action1),
            2 => Some(GameAction::Action2),
            3 => Some(GameAction::Action3),
            4 => Some(GameAction::Action4),
            5 => Some(GameAction::Action5),
            6 => Some(GameAction::Action6),
            7 => Some(GameAction::Action7),
            _ => None,
        }
    }

    fn from_str(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "RESET" => Some(GameAction::Reset),
            "ACTION1" => Some(GameAction::Action1),
            "ACTION2" => Some(GameAction::Action2),
            "ACTION3" => Some(GameAction::Action3),
            "ACTION4" => Some(GameAction::Action4),
            "ACTION5" => Some(GameAction::Action5),
            "ACTION6" => Some(GameAction::Action6),
            "ACTION7" => Some(GameAction::Action7),
            _ => None,
        }
    }
}

/// Normalizes one `available_actions` element, which the ARC-3 API may
/// report as either an integer or a string token.
fn normalize_one(value: &Value) -> Option<GameAction> {
    match value {
        Value::Number(n) => n.as_u64().and_then(GameAction::from_index),
        Value::String(s) => GameAction::from_str(s),
        _ => None,
    }
}

/// Normalizes a raw `available_actions` array into canonical tokens. Missing
/// or empty input means "no restriction" and is represented as `None` so
/// callers don't confuse it with an explicit empty allow-list.
pub fn normalize_available_actions(raw: Option<&Value>) -> Option<Vec<GameAction>> {
    let array = raw?.as_array()?;
    if array.is_empty() {
        return None;
    }
    let normalized: Vec<GameAction> = array.iter().filter_map(normalize_one).collect();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_integer_tokens() {
        let raw = json!([0, 1, 6]);
        let actions = normalize_available_actions(Some(&raw)).unwrap();
        assert_eq!(actions, vec![GameAction::Reset, GameAction::Action1, GameAction::Action6]);
    }

    #[test]
    fn normalizes_string_tokens() {
        let raw = json!(["RESET", "action2"]);
        let actions = normalize_available_actions(Some(&raw)).unwrap();
        assert_eq!(actions, vec![GameAction::Reset, GameAction::Action2]);
    }

    #[test]
    fn empty_array_means_no_restriction() {
        let raw = json!([]);
        assert!(normalize_available_actions(Some(&raw)).is_none());
    }

    #[test]
    fn missing_field_means_no_restriction() {
        assert!(normalize_available_actions(None).is_none());
    }
}
