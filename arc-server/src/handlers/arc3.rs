use crate::api_error::ApiError;
use crate::state::AppState;
use arc_arc3::{AgentRunConfig, AgentRunner, ContinuationContext, GameFrame, SystemPromptPreset};
use arc_core::stream::{self, StreamEvent};
use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arc3PrepareBody {
    pub game_id: String,
    pub model: String,
    pub system_prompt_id: String,
    pub max_turns: u32,
    pub user_api_key: String,
    pub provider: String,
    #[serde(default)]
    pub existing_game_guid: Option<String>,
    #[serde(default)]
    pub last_frame: Option<GameFrame>,
    #[serde(default)]
    pub previous_response_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Arc3PrepareResponse {
    pub session_id: Uuid,
}

/// Maps the `provider` field to the base URL the ARC-3 agent
/// model client should target — the runner always speaks the OpenAI
/// Responses wire format (`AgentModelClient`), so only the base URL varies
/// by provider, the same OpenAI-compatible-everywhere assumption the
/// service factory makes for DeepSeek.
fn agent_base_url_for(provider: &str) -> Result<&'static str, ApiError> {
    match provider.to_ascii_lowercase().as_str() {
        "openai" => Ok("https://api.openai.com/v1"),
        "xai" | "grok" => Ok("https://api.x.ai/v1"),
        "openrouter" => Ok("https://openrouter.ai/api/v1"),
        "deepseek" => Ok("https://api.deepseek.com"),
        other => Err(ApiError::bad_request(format!("unsupported ARC-3 agent provider: {other}"))),
    }
}

fn preset_for(system_prompt_id: &str) -> SystemPromptPreset {
    match system_prompt_id {
        "twitch" => SystemPromptPreset::Twitch,
        "playbook" => SystemPromptPreset::Playbook,
        _ => SystemPromptPreset::Custom,
    }
}

/// `POST /api/arc3/stream/prepare`: validates the run config,
/// registers a streaming session, and starts the agent loop in the
/// background. The caller subscribes separately via the SSE endpoint below.
pub async fn prepare(
    State(state): State<AppState>,
    Json(body): Json<Arc3PrepareBody>,
) -> Result<Json<Arc3PrepareResponse>, ApiError> {
    let agent_base_url = agent_base_url_for(&body.provider)?.to_string();
    let arc3_api_key = state.config.arc_api_key.clone().ok_or_else(|| ApiError::bad_request("ARC_API_KEY is not configured"))?;

    let continuation = match (body.existing_game_guid, body.last_frame) {
        (Some(guid), Some(frame)) => Some(ContinuationContext { existing_game_guid: guid, last_frame: frame, previous_response_id: body.previous_response_id }),
        (None, None) => None,
        _ => return Err(ApiError::bad_request("existingGameGuid and lastFrame must be supplied together")),
    };

    let preset = preset_for(&body.system_prompt_id);
    let config = AgentRunConfig {
        game_id: body.game_id.clone(),
        model: body.model.clone(),
        preset,
        custom_system_prompt: matches!(preset, SystemPromptPreset::Custom).then(|| body.system_prompt_id.clone()),
        max_turns: body.max_turns,
        user_api_key: body.user_api_key,
        agent_base_url,
        continuation,
    };

    let (session_id, receiver) = state.streams.register().await;
    state.pending_streams.insert(session_id, receiver).await;

    let registry = state.streams.clone();
    let sessions = state.arc3_sessions.clone();
    let model_key = body.model.clone();
    let game_id = body.game_id.clone();

    tokio::spawn(async move {
        stream::with_session(session_id, registry.clone(), || async move {
            stream::emit(StreamEvent::StreamInit { session_id: session_id.to_string() }).await;

            let runner = AgentRunner::new(arc3_api_key, config);
            match runner.run().await {
                Ok(outcome) => {
                    if let Err(e) = persist_frames(&sessions, &session_id.to_string(), &game_id, &model_key, &outcome).await {
                        log::warn!("failed to persist arc3 frames for session {session_id}: {e}");
                    }
                    stream::emit(StreamEvent::StreamEnd { reason: "complete".into() }).await;
                }
                Err(e) => stream::emit(StreamEvent::StreamError { message: e.to_string() }).await,
            }
        })
        .await;

        registry.unregister(session_id).await;
    });

    Ok(Json(Arc3PrepareResponse { session_id }))
}

fn terminal_status(terminal_state: &str) -> &'static str {
    match terminal_state {
        "WIN" => "won",
        "GAME_OVER" => "game_over",
        _ => "complete",
    }
}

async fn persist_frames(
    sessions: &arc_storage::Arc3SessionStore,
    session_id: &str,
    game_id: &str,
    model_key: &str,
    outcome: &arc_arc3::RunOutcome,
) -> Result<(), arc_core::CoreError> {
    sessions.open_session(session_id, game_id, model_key, &outcome.card_id).await?;
    for frame in &outcome.frames {
        sessions.append_frame(session_id, frame).await?;
    }
    sessions
        .close_session(
            session_id,
            terminal_status(&outcome.terminal_state),
            outcome.final_score,
            outcome.win_score,
            Some(outcome.frames.len() as i32),
        )
        .await?;
    Ok(())
}

/// `GET /api/arc3/stream/{sessionId}` — SSE subscription.
pub async fn stream_subscribe(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.pending_streams.take(session_id).await;

    let event_stream = async_stream::stream! {
        let Some(mut receiver) = receiver else {
            yield Ok(Event::default().event("stream.error").data(r#"{"message":"unknown or already-consumed session"}"#));
            return;
        };
        while let Some(event) = receiver.recv().await {
            let data = serde_json::to_string(&event).unwrap_or_default();
            yield Ok(Event::default().data(data));
        }
    };

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}

/// `POST /api/arc3/stream/cancel/{sessionId}`: graceful cancel —
/// the agent loop checks [`stream::is_cancelled`] at each turn boundary and
/// lets any in-flight provider call finish rather than aborting it.
pub async fn cancel(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> impl IntoResponse {
    state.streams.cancel(session_id).await;
    Json(serde_json::json!({ "cancelled": true }))
}
