//! The single-shot "analyze one puzzle with one model" pipeline — load
//! puzzle → build prompt → call provider → validate → persist.

use crate::analysis::{Explanation, NewExplanation};
use crate::error::CoreError;
use crate::prompt::{self, AssemblyInputs, PromptContext};
use crate::pricing;
use crate::puzzle::Puzzle;
use crate::repository::ExplanationRepository;
use crate::stream;
use crate::validator;
use arc_provider::{
    capabilities_for, AnalyzeOptions, ConversationState, PromptMode, ProviderAdapter,
};
use chrono::Utc;

/// Everything one `analyze` call needs beyond the puzzle, already validated
/// at the HTTP boundary.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub model_key: String,
    pub temperature: f32,
    pub prompt_mode: PromptMode,
    pub omit_answer: bool,
    pub custom_system_prompt: Option<String>,
    pub options: AnalyzeOptions,
}

/// Runs the full single-shot pipeline for one puzzle+model+mode execution.
///
/// Bails out before any provider call or DB write when a continuation is
/// requested across incompatible provider families.
pub async fn analyze_once(
    puzzle: &Puzzle,
    adapter: &dyn ProviderAdapter,
    repository: &dyn ExplanationRepository,
    request: &AnalyzeRequest,
) -> Result<Explanation, CoreError> {
    if puzzle.test_count() == 0 {
        return Err(CoreError::InputValidation(format!(
            "puzzle {} has no test cases",
            puzzle.id
        )));
    }

    let capabilities = capabilities_for(&request.model_key);

    if let Some(ref prev_id) = request.options.previous_response_id {
        if let Some(owner) = repository.find_by_provider_response_id(prev_id).await? {
            let owning_family = capabilities_for(&owner.model_key).family;
            if owning_family != capabilities.family {
                return Err(CoreError::ProviderMismatch {
                    requested: capabilities.family.as_str().to_string(),
                    owning: owning_family.as_str().to_string(),
                });
            }
        }
    }

    let conversation_state = if request.options.previous_response_id.is_some()
        && request.prompt_mode.allows_continuation()
    {
        ConversationState::Continuation
    } else {
        ConversationState::Initial
    };

    let ctx = PromptContext {
        mode: request.prompt_mode,
        state: conversation_state,
        provider_family: capabilities.family,
        is_multi_test: puzzle.is_multi_test(),
        has_original_explanation: request.options.original_explanation.is_some(),
        has_previous_analysis: request.options.previous_analysis.is_some(),
        emoji_mode: request.prompt_mode.requires_emojis(),
    };

    let assembly_inputs = AssemblyInputs {
        original_explanation: request.options.original_explanation.as_ref(),
        previous_analysis: request.options.previous_analysis.as_ref(),
        custom_challenge: request.options.custom_challenge.as_deref(),
        custom_system_prompt: request.custom_system_prompt.as_deref(),
        omit_answer: request.omit_answer,
    };

    let puzzle_input = puzzle.to_input();
    let assembled = prompt::assemble(&ctx, &puzzle_input, &assembly_inputs);

    stream::log_info(&format!("calling {} for puzzle {}", adapter.provider_name(), puzzle.id)).await;

    let response = adapter
        .analyze(
            &puzzle_input,
            &request.model_key,
            request.temperature,
            request.prompt_mode,
            &assembled.system_prompt,
            &assembled.user_prompt,
            &request.options,
        )
        .await?;

    let expected: Vec<Option<arc_provider::Grid>> = puzzle
        .test
        .iter()
        .map(|t| t.expected_output.clone())
        .collect();

    let predictions: Vec<Option<arc_provider::Grid>> = if puzzle.is_multi_test() {
        response
            .multi_test_prediction_grids
            .clone()
            .unwrap_or_else(|| vec![None; puzzle.test_count()])
    } else {
        vec![response.predicted_output.clone()]
    };

    let verdict = validator::validate(&predictions, &expected);

    let mut usage = response.usage.clone();
    usage.cost_usd = Some(pricing::cost_for(&request.model_key, &usage));

    let new_explanation = NewExplanation {
        puzzle_id: puzzle.id.clone(),
        model_key: request.model_key.clone(),
        prompt_mode: request.prompt_mode,
        temperature: request.temperature,
        reasoning_effort: request.options.reasoning_effort,
        reasoning_verbosity: request.options.reasoning_verbosity,
        reasoning_summary: request.options.reasoning_summary,
        input_tokens: usage.input_tokens,
        output_tokens: usage.output_tokens,
        reasoning_tokens: usage.reasoning_tokens,
        total_tokens: usage.total_tokens,
        cost_usd: usage.cost_usd,
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
        rebutting_explanation_id: request.options.rebutting_explanation_id,
        status: response.status,
        incomplete_reason: response.incomplete_reason,
        grover_iteration_count: None,
        grover_iterations: None,
        grover_best_program: None,
        system_prompt: assembled.system_prompt,
        user_prompt: assembled.user_prompt,
        provider_raw_response: response.provider_raw_response,
    };

    let saved = repository.save_explanation(new_explanation).await?;
    stream::log_info(&format!("persisted explanation {} for puzzle {}", saved.id, puzzle.id)).await;
    Ok(saved)
}

/// Stamps `created_at` at the moment of persistence — kept here rather than
/// in the repository so storage backends don't each reimplement "now".
pub fn stamp_created_at() -> chrono::DateTime<Utc> {
    Utc::now()
}
