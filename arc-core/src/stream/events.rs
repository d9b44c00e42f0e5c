use serde::{Deserialize, Serialize};

/// Every event type the streaming bus can carry. Tagged so
/// it serializes directly as SSE `data:` payloads or WebSocket `{type,
/// data}` frames — mirrors the shape of `llm_kit_core`'s `TextStreamPart`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Log {
        level: LogLevel,
        context: String,
        message: String,
        timestamp: String,
    },
    Progress {
        phase: String,
        iteration: Option<u32>,
        payload: serde_json::Value,
    },
    #[serde(rename = "game.frame_update")]
    GameFrameUpdate {
        frame_number: u32,
        is_animation: bool,
        animation_frame: Option<u32>,
        animation_total_frames: Option<u32>,
        is_last_animation_frame: bool,
    },
    #[serde(rename = "agent.reasoning")]
    AgentReasoning { delta: String },
    #[serde(rename = "agent.tool_call")]
    AgentToolCall {
        call_id: String,
        name: String,
        arguments: serde_json::Value,
    },
    #[serde(rename = "agent.tool_result")]
    AgentToolResult {
        call_id: String,
        name: String,
        success: bool,
        output: serde_json::Value,
    },
    #[serde(rename = "agent.completed")]
    AgentCompleted { reason: String },
    #[serde(rename = "stream.init")]
    StreamInit { session_id: String },
    #[serde(rename = "stream.end")]
    StreamEnd { reason: String },
    #[serde(rename = "stream.error")]
    StreamError { message: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}
