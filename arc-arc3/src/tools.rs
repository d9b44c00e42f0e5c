use crate::action::{normalize_available_actions, GameAction};
use crate::frame::GameFrame;
use arc_sandbox::{SandboxError, SandboxPurpose};
use serde_json::{json, Value};
use thiserror::Error;

/// One function-calling tool exposed to the ARC-3 agent.
#[derive(Debug, Clone)]
pub enum ToolCall {
    InspectGameState,
    AnalyzeGrid { python_code: String },
    ResetGame,
    Simple(GameAction),
    Action6 { x: i64, y: i64 },
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("action {0:?} is not in the current available_actions set")]
    ActionNotAvailable(GameAction),
    #[error("ACTION6 coordinates must be integers in [0, 63], got ({0}, {1})")]
    CoordinateOutOfRange(i64, i64),
    #[error("sandbox execution failed: {0}")]
    Sandbox(#[from] SandboxError),
}

/// Parses a function-call name and JSON arguments into a [`ToolCall`]:
/// `inspect_game_state`, `analyze_grid`, `reset_game`, `action1`..`action5`,
/// `action7`, `action6(x, y)`.
pub fn parse_tool_call(name: &str, arguments: &Value) -> Result<ToolCall, ToolError> {
    match name {
        "inspect_game_state" => Ok(ToolCall::InspectGameState),
        "reset_game" => Ok(ToolCall::ResetGame),
        "action1" => Ok(ToolCall::Simple(GameAction::Action1)),
        "action2" => Ok(ToolCall::Simple(GameAction::Action2)),
        "action3" => Ok(ToolCall::Simple(GameAction::Action3)),
        "action4" => Ok(ToolCall::Simple(GameAction::Action4)),
        "action5" => Ok(ToolCall::Simple(GameAction::Action5)),
        "action7" => Ok(ToolCall::Simple(GameAction::Action7)),
        "action6" => Ok(ToolCall::Action6 {
            x: arguments.get("x").and_then(Value::as_i64).unwrap_or(-1),
            y: arguments.get("y").and_then(Value::as_i64).unwrap_or(-1),
        }),
        "analyze_grid" => Ok(ToolCall::AnalyzeGrid {
            python_code: arguments.get("python_code").and_then(Value::as_str).unwrap_or_default().to_string(),
        }),
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

/// Validates a parsed tool call against the frame's current
/// `available_actions` restriction, enforced at tool-dispatch time: an
/// agent attempting an action outside that set gets a tool error back.
pub fn validate_tool_call(call: &ToolCall, current_frame: &GameFrame) -> Result<(), ToolError> {
    let action = match call {
        ToolCall::ResetGame => Some(GameAction::Reset),
        ToolCall::Simple(action) => Some(*action),
        ToolCall::Action6 { x, y } => {
            if !(0..=63).contains(x) || !(0..=63).contains(y) {
                return Err(ToolError::CoordinateOutOfRange(*x, *y));
            }
            Some(GameAction::Action6)
        }
        ToolCall::InspectGameState | ToolCall::AnalyzeGrid { .. } => None,
    };

    let Some(action) = action else { return Ok(()) };

    let allowed = normalize_available_actions(current_frame.available_actions.as_ref());
    match allowed {
        None => Ok(()),
        Some(list) if list.contains(&action) => Ok(()),
        Some(_) => Err(ToolError::ActionNotAvailable(action)),
    }
}

/// Runs `analyze_grid`'s python source in the sandbox against the current
/// frame's first layer, with `grid`/`current_layer` plus the grid-analysis
/// helpers available in its execution context.
pub async fn run_analyze_grid(python_code: &str, current_frame: &GameFrame, current_layer: usize) -> Result<String, ToolError> {
    let layer = current_frame.layers.get(current_layer).or_else(|| current_frame.layers.first());
    let grid_value = layer.map(|g| serde_json::to_value(&g.0).unwrap_or(Value::Null)).unwrap_or(Value::Null);

    let context = json!({
        "grid": grid_value,
        "current_layer": current_layer,
    });

    let output = arc_sandbox::run(python_code, &context, SandboxPurpose::AnalyzeGrid).await?;
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc_provider::Grid;
    use serde_json::json;

    fn frame_with_actions(available_actions: Option<Value>) -> GameFrame {
        GameFrame {
            frame_number: 0,
            layers: vec![Grid(vec![vec![1, 2], vec![3, 4]])],
            state: "IN_PROGRESS".into(),
            score: None,
            is_animation: false,
            animation_frame: None,
            animation_total_frames: None,
            is_last_animation_frame: true,
            available_actions,
        }
    }

    #[test]
    fn parses_action6_coordinates() {
        let call = parse_tool_call("action6", &json!({"x": 10, "y": 20})).unwrap();
        assert!(matches!(call, ToolCall::Action6 { x: 10, y: 20 }));
    }

    #[test]
    fn rejects_out_of_range_action6_coordinates() {
        let call = ToolCall::Action6 { x: 64, y: 0 };
        let err = validate_tool_call(&call, &frame_with_actions(None)).unwrap_err();
        assert!(matches!(err, ToolError::CoordinateOutOfRange(64, 0)));
    }

    #[test]
    fn rejects_negative_action6_coordinates() {
        let call = ToolCall::Action6 { x: -1, y: 0 };
        let err = validate_tool_call(&call, &frame_with_actions(None)).unwrap_err();
        assert!(matches!(err, ToolError::CoordinateOutOfRange(-1, 0)));
    }

    #[test]
    fn empty_available_actions_means_unrestricted() {
        let call = ToolCall::Simple(GameAction::Action3);
        assert!(validate_tool_call(&call, &frame_with_actions(Some(json!([])))).is_ok());
    }

    #[test]
    fn disallowed_action_is_rejected_at_dispatch() {
        let call = ToolCall::Simple(GameAction::Action3);
        let err = validate_tool_call(&call, &frame_with_actions(Some(json!([0, 1])))).unwrap_err();
        assert!(matches!(err, ToolError::ActionNotAvailable(GameAction::Action3)));
    }

    #[test]
    fn unknown_tool_name_is_rejected() {
        let err = parse_tool_call("fly_to_the_moon", &json!({})).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(_)));
    }
}
