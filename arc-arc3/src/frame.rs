use arc_provider::Grid;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One settled (or intermediate-animation) game frame.
/// `layers` mirrors the API's `[layer][h][w]` shape, one [`Grid`] per layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameFrame {
    pub frame_number: u32,
    pub layers: Vec<Grid>,
    pub state: String,
    pub score: Option<i64>,
    pub is_animation: bool,
    pub animation_frame: Option<u32>,
    pub animation_total_frames: Option<u32>,
    pub is_last_animation_frame: bool,
    /// Raw `available_actions` as reported by the API on the settled frame,
    /// carried through for tool-dispatch validation.
    pub available_actions: Option<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame field was not a valid 3D or 4D number array")]
    Malformed,
}

fn to_grid(layer: &Value) -> Option<Grid> {
    let rows = layer.as_array()?;
    let grid_rows: Option<Vec<Vec<i32>>> = rows
        .iter()
        .map(|row| row.as_array().map(|cells| cells.iter().filter_map(|c| c.as_i64()).map(|c| c as i32).collect()))
        .collect();
    grid_rows.map(Grid)
}

fn to_layers(frame_value: &Value) -> Option<Vec<Grid>> {
    frame_value.as_array()?.iter().map(to_grid).collect()
}

/// Is `value` a 4D array (an animation: array-of-3D-frames) rather than a
/// single 3D frame? Detected structurally: a 3D frame's outer elements are
/// arrays of rows (arrays of numbers); a 4D animation's outer elements are
/// themselves arrays of layers.
fn is_4d(value: &Value) -> bool {
    value
        .as_array()
        .and_then(|frames| frames.first())
        .and_then(|first_frame| first_frame.as_array())
        .and_then(|layers| layers.first())
        .map(|layer| layer.is_array() && layer.as_array().map(|rows| rows.first().map(|r| r.is_array()).unwrap_or(false)).unwrap_or(false))
        .unwrap_or(false)
}

/// Unpacks the ARC-3 `frame` field into one or more [`GameFrame`]s,
/// numbered contiguously from `next_frame_number`.
///
/// A 3D frame wraps into a single-element sequence. A 4D animation of N
/// frames splits into N sequential frames; only the last carries the
/// API-reported `state`/`score` — earlier ones are synthesized as
/// `IN_PROGRESS` with a null score, since the API only settles on the last.
pub fn unpack_frames(
    raw: &Value,
    api_state: &str,
    api_score: Option<i64>,
    api_available_actions: Option<&Value>,
    next_frame_number: u32,
) -> Result<Vec<GameFrame>, FrameError> {
    if is_4d(raw) {
        let frames = raw.as_array().ok_or(FrameError::Malformed)?;
        let total = frames.len() as u32;
        let mut out = Vec::with_capacity(frames.len());
        for (i, frame_value) in frames.iter().enumerate() {
            let layers = to_layers(frame_value).ok_or(FrameError::Malformed)?;
            let is_last = i as u32 == total - 1;
            out.push(GameFrame {
                frame_number: next_frame_number + i as u32,
                layers,
                state: if is_last { api_state.to_string() } else { "IN_PROGRESS".to_string() },
                score: if is_last { api_score } else { None },
                is_animation: true,
                animation_frame: Some(i as u32),
                animation_total_frames: Some(total),
                is_last_animation_frame: is_last,
                available_actions: if is_last { api_available_actions.cloned() } else { None },
            });
        }
        Ok(out)
    } else {
        let layers = to_layers(raw).ok_or(FrameError::Malformed)?;
        Ok(vec![GameFrame {
            frame_number: next_frame_number,
            layers,
            state: api_state.to_string(),
            score: api_score,
            is_animation: false,
            animation_frame: None,
            animation_total_frames: None,
            is_last_animation_frame: true,
            available_actions: api_available_actions.cloned(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layer(fill: i32) -> Value {
        json!([[fill, fill], [fill, fill]])
    }

    #[test]
    fn wraps_3d_frame_as_single_element() {
        let raw = json!([layer(1), layer(2)]);
        let frames = unpack_frames(&raw, "IN_PROGRESS", Some(10), None, 0).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].frame_number, 0);
        assert!(!frames[0].is_animation);
        assert_eq!(frames[0].score, Some(10));
    }

    #[test]
    fn splits_4d_animation_into_n_frames_with_only_last_settled() {
        let raw = json!([
            [layer(1), layer(1)],
            [layer(2), layer(2)],
            [layer(3), layer(3)],
        ]);
        let frames = unpack_frames(&raw, "WIN", Some(100), None, 5).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].frame_number, 5);
        assert_eq!(frames[1].frame_number, 6);
        assert_eq!(frames[2].frame_number, 7);
        assert_eq!(frames[0].state, "IN_PROGRESS");
        assert_eq!(frames[0].score, None);
        assert_eq!(frames[1].state, "IN_PROGRESS");
        assert_eq!(frames[1].score, None);
        assert_eq!(frames[2].state, "WIN");
        assert_eq!(frames[2].score, Some(100));
        assert!(frames[2].is_last_animation_frame);
        assert_eq!(frames[0].animation_total_frames, Some(3));
    }
}
