use crate::agent_model::{AgentModelClient, ToolDefinition};
use crate::client::{Arc3Client, Arc3ClientError};
use crate::frame::{unpack_frames, GameFrame};
use crate::scorecard::Scorecard;
use crate::tools::{parse_tool_call, run_analyze_grid, validate_tool_call, ToolCall, ToolError};
use arc_core::stream::{self, StreamEvent};
use chrono::Utc;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPromptPreset {
    Twitch,
    Playbook,
    Custom,
}

/// Continuation context to resume a paused run. Both fields are required
/// together — there is no way to
/// reconstruct an in-flight scorecard race from the database alone.
#[derive(Debug, Clone)]
pub struct ContinuationContext {
    pub existing_game_guid: String,
    pub last_frame: GameFrame,
    pub previous_response_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AgentRunConfig {
    pub game_id: String,
    pub model: String,
    pub preset: SystemPromptPreset,
    pub custom_system_prompt: Option<String>,
    pub max_turns: u32,
    pub user_api_key: String,
    pub agent_base_url: String,
    pub continuation: Option<ContinuationContext>,
}

/// Result of a completed agent run: every frame observed, the scorecard id
/// it was scored under, and the terminal score/state the caller persists
/// alongside the session row.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub card_id: String,
    pub frames: Vec<GameFrame>,
    pub final_score: Option<i64>,
    pub win_score: Option<i64>,
    pub terminal_state: String,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("continuation requires both existingGameGuid and lastFrame")]
    IncompleteContinuation,
    #[error(transparent)]
    Client(#[from] Arc3ClientError),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    Provider(#[from] arc_provider::ProviderError),
}

fn system_prompt(config: &AgentRunConfig) -> String {
    match config.preset {
        SystemPromptPreset::Twitch => {
            "You are playing an ARC-3 game live. React quickly to the current frame, favor simple exploratory actions, and narrate your reasoning briefly.".to_string()
        }
        SystemPromptPreset::Playbook => {
            "You are playing an ARC-3 game methodically. Use analyze_grid to understand structure before acting, and build a repeatable strategy.".to_string()
        }
        SystemPromptPreset::Custom => config.custom_system_prompt.clone().unwrap_or_default(),
    }
}

fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "inspect_game_state".into(),
            description: "Return the current settled frame: grid, available actions, score, and state.".into(),
            parameters: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: "analyze_grid".into(),
            description: "Execute python against the current frame's grid in a sandbox (numpy, scipy.ndimage, and grid-analysis helpers available).".into(),
            parameters: json!({
                "type": "object",
                "properties": { "python_code": { "type": "string" } },
                "required": ["python_code"],
            }),
        },
        ToolDefinition {
            name: "reset_game".into(),
            description: "Issue a RESET command.".into(),
            parameters: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: "action1".into(),
            description: "Simple action 1.".into(),
            parameters: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: "action2".into(),
            description: "Simple action 2.".into(),
            parameters: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: "action3".into(),
            description: "Simple action 3.".into(),
            parameters: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: "action4".into(),
            description: "Simple action 4.".into(),
            parameters: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: "action5".into(),
            description: "Simple action 5.".into(),
            parameters: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: "action7".into(),
            description: "Simple action 7.".into(),
            parameters: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: "action6".into(),
            description: "Coordinate action at (x, y), each in [0, 63].".into(),
            parameters: json!({
                "type": "object",
                "properties": { "x": { "type": "integer" }, "y": { "type": "integer" } },
                "required": ["x", "y"],
            }),
        },
    ]
}

fn is_terminal(state: &str) -> bool {
    matches!(state, "WIN" | "GAME_OVER")
}

/// Drives one ARC-3 agent run end to end.
pub struct AgentRunner {
    arc3: Arc3Client,
    model: AgentModelClient,
    config: AgentRunConfig,
}

impl AgentRunner {
    pub fn new(arc3_api_key: impl Into<String>, config: AgentRunConfig) -> Self {
        let model = AgentModelClient::new(config.agent_base_url.clone(), config.user_api_key.clone());
        Self { arc3: Arc3Client::new(arc3_api_key), model, config }
    }

    /// Runs the full turn loop, opening/closing the scorecard around it and
    /// persisting/emitting every frame.
    pub async fn run(&self) -> Result<RunOutcome, RunnerError> {
        if self.config.continuation.is_some() {
            let cont = self.config.continuation.as_ref().unwrap();
            if cont.existing_game_guid.is_empty() {
                return Err(RunnerError::IncompleteContinuation);
            }
        }

        let card_id = self.arc3.open_scorecard().await?;
        let scorecard = Scorecard::new(card_id);
        let result = self.run_inner(&scorecard).await;

        if let Err(e) = self.arc3.close_scorecard(&scorecard.card_id).await {
            log::warn!("failed to close scorecard {}: {e}", scorecard.card_id);
        }
        result.map(|(frames, win_score, terminal_state)| {
            let final_score = frames.last().and_then(|f| f.score);
            RunOutcome { card_id: scorecard.card_id.clone(), frames, final_score, win_score, terminal_state }
        })
    }

    async fn run_inner(&self, scorecard: &Scorecard) -> Result<(Vec<GameFrame>, Option<i64>, String), RunnerError> {
        let tools = tool_definitions();
        let system_prompt = system_prompt(&self.config);
        let mut all_frames: Vec<GameFrame> = Vec::new();
        let mut next_frame_number: u32 = 0;
        let mut win_score: Option<i64> = None;

        let (mut guid, mut current_frame) = if let Some(cont) = &self.config.continuation {
            (cont.existing_game_guid.clone(), cont.last_frame.clone())
        } else {
            let response = self.arc3.reset(&self.config.game_id, &scorecard.card_id, None).await?;
            win_score = response.win_score.or(win_score);
            let frames = unpack_frames(
                &response.frame,
                &response.state,
                response.score,
                response.available_actions.as_ref(),
                next_frame_number,
            )?;
            next_frame_number += frames.len() as u32;
            self.emit_frames(&frames).await;
            all_frames.extend(frames.clone());
            (response.guid, frames.last().cloned().expect("reset always yields at least one frame"))
        };

        let mut previous_response_id = self.config.continuation.as_ref().and_then(|c| c.previous_response_id.clone());
        let mut last_function_output: Option<(String, String)> = None;

        for _turn in 0..self.config.max_turns {
            if stream::is_cancelled().await {
                break;
            }
            if is_terminal(&current_frame.state) {
                stream::emit(StreamEvent::AgentCompleted { reason: current_frame.state.clone() }).await;
                break;
            }
            if scorecard.is_expired(Utc::now()) {
                stream::emit(StreamEvent::AgentCompleted { reason: "scorecard_expired".into() }).await;
                break;
            }

            let input_text = if last_function_output.is_some() {
                String::new()
            } else {
                format!(
                    "Current frame state: {}. Available actions: {:?}",
                    current_frame.state, current_frame.layers.len()
                )
            };

            let turn = self
                .model
                .send_turn(
                    &self.config.model,
                    &system_prompt,
                    &input_text,
                    &tools,
                    previous_response_id.as_deref(),
                    last_function_output.as_ref().map(|(id, out)| (id.as_str(), out.as_str())),
                )
                .await?;
            previous_response_id = turn.response_id.or(previous_response_id);
            last_function_output = None;

            if let Some(reasoning) = &turn.reasoning_summary {
                stream::emit(StreamEvent::AgentReasoning { delta: reasoning.clone() }).await;
            }

            for call in &turn.function_calls {
                stream::emit(StreamEvent::AgentToolCall {
                    call_id: call.call_id.clone(),
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                })
                .await;

                let dispatch_result = self
                    .dispatch_tool_call(&call.name, &call.arguments, &current_frame, &guid, scorecard, &mut next_frame_number, &mut all_frames, &mut win_score)
                    .await;

                let (success, output) = match dispatch_result {
                    Ok(Some(new_frame)) => {
                        current_frame = new_frame;
                        (true, json!({ "state": current_frame.state, "score": current_frame.score }))
                    }
                    Ok(None) => (true, Value::Null),
                    Err(err) => (false, json!({ "error": err.to_string() })),
                };

                stream::emit(StreamEvent::AgentToolResult {
                    call_id: call.call_id.clone(),
                    name: call.name.clone(),
                    success,
                    output: output.clone(),
                })
                .await;

                last_function_output = Some((call.call_id.clone(), output.to_string()));
            }

            if turn.function_calls.is_empty() {
                // Model produced no tool call this turn; nothing to dispatch,
                // so the next turn resends the current frame description.
                last_function_output = None;
            }
        }

        let terminal_state = current_frame.state.clone();
        Ok((all_frames, win_score, terminal_state))
    }

    #[allow(clippy::too_many_arguments)]
    async fn dispatch_tool_call(
        &self,
        name: &str,
        arguments: &Value,
        current_frame: &GameFrame,
        guid: &str,
        scorecard: &Scorecard,
        next_frame_number: &mut u32,
        all_frames: &mut Vec<GameFrame>,
        win_score: &mut Option<i64>,
    ) -> Result<Option<GameFrame>, RunnerError> {
        let call = parse_tool_call(name, arguments)?;
        validate_tool_call(&call, current_frame)?;

        match call {
            ToolCall::InspectGameState => Ok(None),
            ToolCall::AnalyzeGrid { python_code } => {
                run_analyze_grid(&python_code, current_frame, 0).await?;
                Ok(None)
            }
            ToolCall::ResetGame => {
                let response = self.arc3.reset(&self.config.game_id, &scorecard.card_id, Some(guid)).await?;
                *win_score = response.win_score.or(*win_score);
                self.unpack_and_record(
                    &response.frame,
                    &response.state,
                    response.score,
                    response.available_actions.as_ref(),
                    next_frame_number,
                    all_frames,
                )
                .await
            }
            ToolCall::Simple(action) => {
                let response = self.arc3.simple_action(action, &self.config.game_id, &scorecard.card_id, guid).await?;
                *win_score = response.win_score.or(*win_score);
                self.unpack_and_record(
                    &response.frame,
                    &response.state,
                    response.score,
                    response.available_actions.as_ref(),
                    next_frame_number,
                    all_frames,
                )
                .await
            }
            ToolCall::Action6 { x, y } => {
                let response = self.arc3.action6(&self.config.game_id, &scorecard.card_id, guid, x as u8, y as u8).await?;
                *win_score = response.win_score.or(*win_score);
                self.unpack_and_record(
                    &response.frame,
                    &response.state,
                    response.score,
                    response.available_actions.as_ref(),
                    next_frame_number,
                    all_frames,
                )
                .await
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn unpack_and_record(
        &self,
        raw_frame: &Value,
        state: &str,
        score: Option<i64>,
        available_actions: Option<&Value>,
        next_frame_number: &mut u32,
        all_frames: &mut Vec<GameFrame>,
    ) -> Result<Option<GameFrame>, RunnerError> {
        let frames = unpack_frames(raw_frame, state, score, available_actions, *next_frame_number)?;
        *next_frame_number += frames.len() as u32;
        self.emit_frames(&frames).await;
        let last = frames.last().cloned();
        all_frames.extend(frames);
        Ok(last)
    }

    async fn emit_frames(&self, frames: &[GameFrame]) {
        for frame in frames {
            stream::emit(StreamEvent::GameFrameUpdate {
                frame_number: frame.frame_number,
                is_animation: frame.is_animation,
                animation_frame: frame.animation_frame,
                animation_total_frames: frame.animation_total_frames,
                is_last_animation_frame: frame.is_last_animation_frame,
            })
            .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twitch_and_playbook_presets_differ() {
        let twitch = AgentRunConfig {
            game_id: "ls20".into(),
            model: "gpt-5".into(),
            preset: SystemPromptPreset::Twitch,
            custom_system_prompt: None,
            max_turns: 1,
            user_api_key: "k".into(),
            agent_base_url: "https://api.openai.com/v1".into(),
            continuation: None,
        };
        let mut playbook = twitch.clone();
        playbook.preset = SystemPromptPreset::Playbook;
        assert_ne!(system_prompt(&twitch), system_prompt(&playbook));
    }

    #[test]
    fn custom_preset_uses_supplied_prompt() {
        let config = AgentRunConfig {
            game_id: "ls20".into(),
            model: "gpt-5".into(),
            preset: SystemPromptPreset::Custom,
            custom_system_prompt: Some("be careful".into()),
            max_turns: 1,
            user_api_key: "k".into(),
            agent_base_url: "https://api.openai.com/v1".into(),
            continuation: None,
        };
        assert_eq!(system_prompt(&config), "be careful");
    }

    #[test]
    fn terminal_states_are_recognized() {
        assert!(is_terminal("WIN"));
        assert!(is_terminal("GAME_OVER"));
        assert!(!is_terminal("IN_PROGRESS"));
    }
}
