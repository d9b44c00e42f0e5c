use crate::api_error::ApiError;
use crate::state::AppState;
use arc_core::analysis::NewExplanation;
use arc_core::repository::{ExplanationRepository as _, PuzzleRepository as _};
use arc_core::validator;
use arc_provider::{AnalysisResponse, PromptMode};
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use std::collections::HashMap;

/// One already-computed analysis to persist, keyed by model in
/// [`SaveExplainedBody`]. `rebutting_explanation_id` carries the parent
/// explanation id through for analyses saved via the bulk path (e.g. a
/// debate/discussion result computed client-side) rather than via
/// `analyze_once`.
#[derive(Debug, Deserialize)]
pub struct SavedAnalysis {
    #[serde(flatten)]
    pub response: AnalysisResponse,
    #[serde(default)]
    pub rebutting_explanation_id: Option<i64>,
}

/// Body for `POST /api/puzzle/save-explained/{puzzleId}`: a batch
/// of already-computed analyses, keyed by model, persisted without a fresh
/// provider call — the path ingestion scripts and bulk-import tooling use.
#[derive(Debug, Deserialize)]
pub struct SaveExplainedBody {
    pub explanations: HashMap<String, SavedAnalysis>,
}

pub async fn save_explained(
    State(state): State<AppState>,
    Path(puzzle_id): Path<String>,
    Json(body): Json<SaveExplainedBody>,
) -> Result<Json<Vec<arc_core::Explanation>>, ApiError> {
    let puzzle = state.puzzles.load(&puzzle_id).await?;
    let expected: Vec<_> = puzzle.test.iter().map(|t| t.expected_output.clone()).collect();

    let mut saved = Vec::with_capacity(body.explanations.len());
    for (model_key, saved_analysis) in body.explanations {
        let SavedAnalysis { response, rebutting_explanation_id } = saved_analysis;
        let predictions = if puzzle.is_multi_test() {
            response.multi_test_prediction_grids.clone().unwrap_or_else(|| vec![None; puzzle.test_count()])
        } else {
            vec![response.predicted_output.clone()]
        };
        let verdict = validator::validate(&predictions, &expected);

        let new_explanation = NewExplanation {
            puzzle_id: puzzle_id.clone(),
            model_key,
            prompt_mode: PromptMode::Solver,
            temperature: 0.0,
            reasoning_effort: None,
            reasoning_verbosity: None,
            reasoning_summary: None,
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
            reasoning_tokens: response.usage.reasoning_tokens,
            total_tokens: response.usage.total_tokens,
            cost_usd: response.usage.cost_usd,
            predicted_output: response.predicted_output,
            multi_test_prediction_grids: response.multi_test_prediction_grids,
            is_prediction_correct: verdict.is_prediction_correct,
            multi_test_all_correct: verdict.multi_test_all_correct,
            per_test_correctness: verdict.per_test_correctness,
            confidence: response.confidence,
            pattern_description: response.pattern_description,
            solving_strategy: response.solving_strategy,
            hints: response.hints,
            provider_response_id: response.provider_response_id,
            rebutting_explanation_id,
            status: response.status,
            incomplete_reason: response.incomplete_reason,
            grover_iteration_count: None,
            grover_iterations: None,
            grover_best_program: None,
            system_prompt: String::new(),
            user_prompt: String::new(),
            provider_raw_response: response.provider_raw_response,
        };

        saved.push(state.explanations.save_explanation(new_explanation).await?);
    }

    Ok(Json(saved))
}
