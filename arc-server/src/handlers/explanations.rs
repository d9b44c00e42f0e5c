use crate::api_error::ApiError;
use crate::state::AppState;
use arc_core::repository::ExplanationRepository as _;
use axum::extract::{Path, State};
use axum::Json;

/// `GET /api/puzzle/{puzzleId}/explanations`.
pub async fn list_for_puzzle(
    State(state): State<AppState>,
    Path(puzzle_id): Path<String>,
) -> Result<Json<Vec<arc_core::Explanation>>, ApiError> {
    let explanations = state.explanations.list_for_puzzle(&puzzle_id).await?;
    Ok(Json(explanations))
}

/// `GET /api/discussion/eligible`: explanations with a non-null
/// `providerResponseId` no older than 30 days.
pub async fn discussion_eligible(State(state): State<AppState>) -> Result<Json<Vec<arc_core::Explanation>>, ApiError> {
    let explanations = state.explanations.list_discussion_eligible().await?;
    Ok(Json(explanations))
}
