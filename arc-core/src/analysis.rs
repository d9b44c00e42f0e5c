use arc_provider::{AnalysisStatus, Grid, PromptMode, ReasoningEffort, ReasoningSummary, ReasoningVerbosity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One Grover iteration's worth of generated programs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroverProgramResult {
    pub code: String,
    pub score: f64,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroverIteration {
    pub programs: Vec<GroverProgramResult>,
}

/// Mutable record produced by one (model, puzzle, prompt-mode, turn)
/// execution. Append-only: corrections create a new row linked
/// via `rebutting_explanation_id` rather than mutating this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub id: i64,
    pub puzzle_id: String,
    pub model_key: String,
    pub prompt_mode: PromptMode,
    pub temperature: f32,
    pub reasoning_effort: Option<ReasoningEffort>,
    pub reasoning_verbosity: Option<ReasoningVerbosity>,
    pub reasoning_summary: Option<ReasoningSummary>,

    pub input_tokens: u32,
    pub output_tokens: u32,
    pub reasoning_tokens: u32,
    pub total_tokens: u32,
    pub cost_usd: Option<f64>,

    pub predicted_output: Option<Grid>,
    pub multi_test_prediction_grids: Option<Vec<Option<Grid>>>,
    pub is_prediction_correct: Option<bool>,
    pub multi_test_all_correct: Option<bool>,
    pub per_test_correctness: Vec<bool>,

    pub confidence: u8,
    pub pattern_description: String,
    pub solving_strategy: String,
    pub hints: Vec<String>,

    /// Opaque id returned by the provider; used for chaining. A null write
    /// here silently breaks every downstream continuation for this chain.
    pub provider_response_id: Option<String>,
    /// Optional link to the analysis being challenged/refined.
    pub rebutting_explanation_id: Option<i64>,

    pub status: AnalysisStatus,
    pub incomplete_reason: Option<String>,

    pub grover_iteration_count: Option<u32>,
    pub grover_iterations: Option<Vec<GroverIteration>>,
    pub grover_best_program: Option<String>,

    pub system_prompt: String,
    pub user_prompt: String,
    pub provider_raw_response: serde_json::Value,

    pub created_at: DateTime<Utc>,
}

/// The fields an orchestrator run has in hand before a row id or timestamp
/// exist — what gets handed to the repository's `save`. Deliberately
/// exhaustive so a missing field is a compile error rather than a silent
/// `providerResponseId`-style regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExplanation {
    pub puzzle_id: String,
    pub model_key: String,
    pub prompt_mode: PromptMode,
    pub temperature: f32,
    pub reasoning_effort: Option<ReasoningEffort>,
    pub reasoning_verbosity: Option<ReasoningVerbosity>,
    pub reasoning_summary: Option<ReasoningSummary>,

    pub input_tokens: u32,
    pub output_tokens: u32,
    pub reasoning_tokens: u32,
    pub total_tokens: u32,
    pub cost_usd: Option<f64>,

    pub predicted_output: Option<Grid>,
    pub multi_test_prediction_grids: Option<Vec<Option<Grid>>>,
    pub is_prediction_correct: Option<bool>,
    pub multi_test_all_correct: Option<bool>,
    pub per_test_correctness: Vec<bool>,

    pub confidence: u8,
    pub pattern_description: String,
    pub solving_strategy: String,
    pub hints: Vec<String>,

    pub provider_response_id: Option<String>,
    pub rebutting_explanation_id: Option<i64>,

    pub status: AnalysisStatus,
    pub incomplete_reason: Option<String>,

    pub grover_iteration_count: Option<u32>,
    pub grover_iterations: Option<Vec<GroverIteration>>,
    pub grover_best_program: Option<String>,

    pub system_prompt: String,
    pub user_prompt: String,
    pub provider_raw_response: serde_json::Value,
}

/// A single node in the reconstructed conversation chain. The full chain is
/// never materialized eagerly; it is reconstructed on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainNode {
    pub explanation_id: i64,
    pub provider_response_id: Option<String>,
    pub model_key: String,
}

const MAX_CHAIN_DEPTH: usize = 20;

/// Walks parent pointers (`rebutting_explanation_id`) starting at `start`,
/// bounded to [`MAX_CHAIN_DEPTH`] to guard against an accidental cycle in
/// corrupted data. `lookup` is supplied by the caller (the storage layer)
/// so this function has no database dependency.
pub fn reconstruct_chain<F>(start: &Explanation, mut lookup: F) -> Vec<ChainNode>
where
    F: FnMut(i64) -> Option<Explanation>,
{
    let mut chain = vec![ChainNode {
        explanation_id: start.id,
        provider_response_id: start.provider_response_id.clone(),
        model_key: start.model_key.clone(),
    }];

    let mut current_parent = start.rebutting_explanation_id;
    let mut depth = 0;
    while let Some(parent_id) = current_parent {
        if depth >= MAX_CHAIN_DEPTH {
            log::warn!("conversation chain exceeded {} hops, truncating walk", MAX_CHAIN_DEPTH);
            break;
        }
        let Some(parent) = lookup(parent_id) else {
            break;
        };
        current_parent = parent.rebutting_explanation_id;
        chain.push(ChainNode {
            explanation_id: parent.id,
            provider_response_id: parent.provider_response_id.clone(),
            model_key: parent.model_key.clone(),
        });
        depth += 1;
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(id: i64, parent: Option<i64>) -> Explanation {
        Explanation {
            id,
            puzzle_id: "00d62c1b".into(),
            model_key: "gpt-5-2025-08-07".into(),
            prompt_mode: PromptMode::Solver,
            temperature: 0.2,
            reasoning_effort: None,
            reasoning_verbosity: None,
            reasoning_summary: None,
            input_tokens: 0,
            output_tokens: 0,
            reasoning_tokens: 0,
            total_tokens: 0,
            cost_usd: None,
            predicted_output: None,
            multi_test_prediction_grids: None,
            is_prediction_correct: None,
            multi_test_all_correct: None,
            per_test_correctness: vec![],
            confidence: 50,
            pattern_description: String::new(),
            solving_strategy: String::new(),
            hints: vec![],
            provider_response_id: Some(format!("resp_{id}")),
            rebutting_explanation_id: parent,
            status: AnalysisStatus::Complete,
            incomplete_reason: None,
            grover_iteration_count: None,
            grover_iterations: None,
            grover_best_program: None,
            system_prompt: String::new(),
            user_prompt: String::new(),
            provider_raw_response: serde_json::Value::Null,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn walks_parent_chain_to_root() {
        let store = [stub(1, None), stub(2, Some(1)), stub(3, Some(2))];
        let lookup = |id: i64| store.iter().find(|e| e.id == id).cloned();
        let chain = reconstruct_chain(&store[2], lookup);
        assert_eq!(chain.iter().map(|n| n.explanation_id).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn bounds_depth_on_cycle() {
        let mut store = vec![stub(1, Some(2)), stub(2, Some(1))];
        store.push(stub(3, Some(1)));
        let lookup = |id: i64| store.iter().find(|e| e.id == id).cloned();
        let chain = reconstruct_chain(&store[2], lookup);
        assert!(chain.len() <= MAX_CHAIN_DEPTH + 1);
    }
}
