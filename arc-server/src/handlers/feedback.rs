use crate::api_error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

/// Body for recording feedback on an explanation: a thumbs up/down vote
/// plus an optional free-text comment.
#[derive(Debug, Deserialize)]
pub struct FeedbackBody {
    pub vote: String,
    #[serde(default)]
    pub comment: Option<String>,
}

pub async fn record_feedback(
    State(state): State<AppState>,
    Path(explanation_id): Path<i64>,
    Json(body): Json<FeedbackBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.feedback.record(explanation_id, &body.vote, body.comment.as_deref()).await?;
    Ok(Json(serde_json::json!({ "recorded": true })))
}
