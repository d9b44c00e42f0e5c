use crate::api_error::ApiError;
use crate::state::AppState;
use arc_core::orchestrator::{analyze_once, AnalyzeRequest};
use arc_core::repository::PuzzleRepository as _;
use arc_provider::{AnalyzeOptions, PriorExplanation, PromptMode, ReasoningEffort, ReasoningSummary, ReasoningVerbosity};
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body for `POST /api/puzzle/analyze/{puzzleId}/{modelKey}`.
/// `prompt_id` is a legacy template selector honored only when
/// `system_prompt_mode` is [`PromptMode::Custom`], in which case it is
/// passed through as the literal custom system prompt text; `retry_mode`
/// is accepted for client compatibility but carries no additional server
/// behavior beyond what `system_prompt_mode` already selects.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    pub temperature: f32,
    #[serde(default)]
    pub prompt_id: Option<String>,
    pub system_prompt_mode: PromptMode,
    #[serde(default)]
    pub omit_answer: bool,
    #[serde(default)]
    pub retry_mode: bool,
    #[serde(default)]
    pub previous_response_id: Option<String>,
    #[serde(default)]
    pub custom_challenge: Option<String>,
    #[serde(default)]
    pub original_explanation: Option<PriorExplanation>,
    #[serde(default)]
    pub rebutting_explanation_id: Option<i64>,
    #[serde(default)]
    pub reasoning_effort: Option<ReasoningEffort>,
    #[serde(default)]
    pub reasoning_verbosity: Option<ReasoningVerbosity>,
    #[serde(default)]
    pub reasoning_summary: Option<ReasoningSummary>,
    #[serde(default)]
    pub user_api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponseBody {
    #[serde(flatten)]
    pub explanation: arc_core::Explanation,
    pub explanation_id: i64,
}

pub async fn analyze(
    State(state): State<AppState>,
    Path((puzzle_id, model_key)): Path<(String, String)>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<AnalyzeResponseBody>, ApiError> {
    let puzzle = state.puzzles.load(&puzzle_id).await?;
    let resolved = state
        .factory
        .resolve(&model_key)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let custom_system_prompt = if matches!(body.system_prompt_mode, PromptMode::Custom) {
        body.prompt_id.clone()
    } else {
        None
    };

    let request = AnalyzeRequest {
        model_key: resolved.model_key.clone(),
        temperature: body.temperature,
        prompt_mode: body.system_prompt_mode,
        omit_answer: body.omit_answer,
        custom_system_prompt,
        options: AnalyzeOptions {
            previous_response_id: body.previous_response_id,
            original_explanation: body.original_explanation,
            previous_analysis: None,
            custom_challenge: body.custom_challenge,
            rebutting_explanation_id: body.rebutting_explanation_id,
            reasoning_effort: body.reasoning_effort,
            reasoning_verbosity: body.reasoning_verbosity,
            reasoning_summary: body.reasoning_summary,
            max_output_tokens: None,
            stream_session_id: None,
            user_api_key: body.user_api_key,
        },
    };

    let explanation = analyze_once(&puzzle, resolved.adapter.as_ref(), state.explanations.as_ref(), &request).await?;

    Ok(Json(AnalyzeResponseBody { explanation_id: explanation.id, explanation }))
}
