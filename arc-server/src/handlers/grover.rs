use crate::api_error::ApiError;
use crate::state::AppState;
use arc_core::analysis::NewExplanation;
use arc_core::repository::{ExplanationRepository as _, PuzzleRepository as _};
use arc_core::stream::{self, StreamEvent};
use arc_core::validator;
use arc_grover::run_grover;
use arc_provider::{AnalysisStatus, PromptMode};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroverBody {
    pub temperature: f32,
    pub max_iterations: u32,
    #[serde(default)]
    pub user_api_key: Option<String>,
    #[serde(default)]
    pub rebutting_explanation_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroverStartedResponse {
    pub session_id: Uuid,
}

/// `POST /api/puzzle/grover/{puzzleId}/{modelKey}`: starts the solver loop
/// in the background and hands back a session id immediately; progress is
/// streamed over the WebSocket endpoint below.
pub async fn start_grover(
    State(state): State<AppState>,
    Path((puzzle_id, model_key)): Path<(String, String)>,
    Json(body): Json<GroverBody>,
) -> Result<Json<GroverStartedResponse>, ApiError> {
    let puzzle = state.puzzles.load(&puzzle_id).await?;
    let resolved = state.factory.resolve(&model_key).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let (session_id, receiver) = state.streams.register().await;
    state.pending_streams.insert(session_id, receiver).await;

    let registry = state.streams.clone();
    let explanations = state.explanations.clone();
    let adapter = resolved.adapter.clone();
    let request_model_key = resolved.model_key.clone();
    let rebutting_explanation_id = body.rebutting_explanation_id;

    tokio::spawn(async move {
        stream::with_session(session_id, registry.clone(), || async move {
            stream::emit(StreamEvent::StreamInit { session_id: session_id.to_string() }).await;

            let outcome = run_grover(&puzzle, adapter.as_ref(), &request_model_key, body.temperature, body.max_iterations, body.user_api_key).await;

            match outcome {
                Ok(result) => {
                    let iteration_count = result.iterations.len() as u32;

                    let expected: Vec<_> = puzzle.test.iter().map(|t| t.expected_output.clone()).collect();
                    let predictions = if puzzle.is_multi_test() {
                        result.multi_test_prediction_grids.clone().unwrap_or_else(|| vec![None; puzzle.test_count()])
                    } else {
                        vec![result.predicted_output.clone()]
                    };
                    let verdict = validator::validate(&predictions, &expected);

                    let new_explanation = NewExplanation {
                        puzzle_id: puzzle.id.clone(),
                        model_key: request_model_key.clone(),
                        prompt_mode: PromptMode::Solver,
                        temperature: body.temperature,
                        reasoning_effort: None,
                        reasoning_verbosity: None,
                        reasoning_summary: None,
                        input_tokens: 0,
                        output_tokens: 0,
                        reasoning_tokens: 0,
                        total_tokens: 0,
                        cost_usd: None,
                        predicted_output: result.predicted_output,
                        multi_test_prediction_grids: result.multi_test_prediction_grids,
                        is_prediction_correct: verdict.is_prediction_correct,
                        multi_test_all_correct: verdict.multi_test_all_correct,
                        per_test_correctness: verdict.per_test_correctness,
                        confidence: 0,
                        pattern_description: String::new(),
                        solving_strategy: String::new(),
                        hints: vec![],
                        provider_response_id: result.last_response_id,
                        rebutting_explanation_id,
                        status: AnalysisStatus::Complete,
                        incomplete_reason: None,
                        grover_iteration_count: Some(iteration_count),
                        grover_iterations: Some(result.iterations),
                        grover_best_program: result.best_program,
                        system_prompt: String::new(),
                        user_prompt: String::new(),
                        provider_raw_response: serde_json::Value::Null,
                    };

                    match explanations.save_explanation(new_explanation).await {
                        Ok(_) => stream::emit(StreamEvent::StreamEnd { reason: "complete".into() }).await,
                        Err(e) => stream::emit(StreamEvent::StreamError { message: e.to_string() }).await,
                    }
                }
                Err(e) => stream::emit(StreamEvent::StreamError { message: e.to_string() }).await,
            }
        })
        .await;

        registry.unregister(session_id).await;
    });

    Ok(Json(GroverStartedResponse { session_id }))
}

/// `GET /api/puzzle/grover/stream/{sessionId}` — WebSocket subscription for
/// the session started above.
pub async fn grover_stream(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_grover_socket(socket, state, session_id))
}

async fn handle_grover_socket(mut socket: WebSocket, state: AppState, session_id: Uuid) {
    let Some(mut receiver) = state.pending_streams.take(session_id).await else {
        let _ = socket.send(Message::Text(r#"{"type":"stream.error","message":"unknown or already-consumed session"}"#.into())).await;
        return;
    };

    while let Some(event) = receiver.recv().await {
        let payload = serde_json::to_string(&event).unwrap_or_default();
        if socket.send(Message::Text(payload.into())).await.is_err() {
            state.streams.cancel(session_id).await;
            break;
        }
    }
}
