//! ARC-3 interactive agent runner: remote game API client,
//! animation frame unpacking, tool registry, and scorecard lifecycle.

mod action;
mod agent_model;
mod client;
mod frame;
mod runner;
mod scorecard;
mod tools;

pub use action::{normalize_available_actions, GameAction};
pub use agent_model::{AgentModelClient, FunctionCallItem, ModelTurn, ToolDefinition};
pub use client::{Arc3Client, Arc3ClientError, CommandResponse};
pub use frame::{unpack_frames, FrameError, GameFrame};
pub use runner::{AgentRunConfig, AgentRunner, ContinuationContext, RunnerError, RunOutcome, SystemPromptPreset};
pub use scorecard::Scorecard;
pub use tools::{parse_tool_call, run_analyze_grid, validate_tool_call, ToolCall, ToolError};
