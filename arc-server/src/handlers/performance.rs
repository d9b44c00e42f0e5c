use crate::api_error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::collections::HashSet;

/// Response for `GET /api/model-dataset/performance/{modelName}/{datasetName}`
///: puzzle ids split three ways against one model's results on one
/// dataset, plus a rollup summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResponse {
    pub correct: Vec<String>,
    pub incorrect: Vec<String>,
    pub not_attempted: Vec<String>,
    pub summary: PerformanceSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total_puzzles: usize,
    pub attempted: usize,
    pub correct_count: usize,
    pub accuracy: f64,
}

pub async fn model_dataset_performance(
    State(state): State<AppState>,
    Path((model_name, dataset_name)): Path<(String, String)>,
) -> Result<Json<PerformanceResponse>, ApiError> {
    let all_ids = state.puzzles.list_dataset_puzzle_ids(&dataset_name).await?;
    let explanations = state.explanations.list_for_model_and_dataset(&model_name, &dataset_name).await?;

    let mut correct = Vec::new();
    let mut incorrect = Vec::new();
    let mut attempted_ids: HashSet<String> = HashSet::new();

    for explanation in &explanations {
        attempted_ids.insert(explanation.puzzle_id.clone());
        let is_correct = explanation.multi_test_all_correct.or(explanation.is_prediction_correct).unwrap_or(false);
        if is_correct {
            correct.push(explanation.puzzle_id.clone());
        } else {
            incorrect.push(explanation.puzzle_id.clone());
        }
    }
    correct.sort();
    correct.dedup();
    incorrect.sort();
    incorrect.dedup();

    let not_attempted: Vec<String> = all_ids.iter().filter(|id| !attempted_ids.contains(*id)).cloned().collect();

    let total_puzzles = all_ids.len();
    let attempted = attempted_ids.len();
    let accuracy = if attempted > 0 { correct.len() as f64 / attempted as f64 } else { 0.0 };

    Ok(Json(PerformanceResponse {
        correct,
        incorrect,
        not_attempted,
        summary: PerformanceSummary { total_puzzles, attempted, correct_count: correct.len(), accuracy },
    }))
}
