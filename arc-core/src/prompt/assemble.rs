use super::context::PromptContext;
use super::grid_render::render;
use super::sections::{self, Section};
use arc_provider::{ConversationState, PriorExplanation, PromptMode, PuzzleInput};

#[derive(Debug, Clone)]
pub struct AssembledPrompt {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Everything assembly needs beyond the puzzle and context.
#[derive(Debug, Clone, Default)]
pub struct AssemblyInputs<'a> {
    pub original_explanation: Option<&'a PriorExplanation>,
    pub previous_analysis: Option<&'a PriorExplanation>,
    pub custom_challenge: Option<&'a str>,
    pub custom_system_prompt: Option<&'a str>,
    pub omit_answer: bool,
}

/// Picks which sections to concatenate for a given mode and conversation
/// state. Modes not explicitly covered are extended by analogy to the
/// closest pattern (solver's shape for plain modes, debate's shape for
/// discussion, since both inject a context block keyed off a prior
/// analysis).
fn sections_for(ctx: &PromptContext) -> Vec<Section> {
    use ConversationState::{Continuation, Initial};
    use PromptMode::*;
    let state = ctx.effective_state();

    match (ctx.mode, state) {
        (Solver | Explanation | Gepa, Initial) => {
            vec![Section::ArcIntroduction, Section::ModeTask, Section::JsonInstructions]
        }
        (Solver | Explanation | Gepa, Continuation) => vec![Section::ModeTask],
        (Custom, _) => vec![],
        (Debate, Initial) => vec![
            Section::ModeRole,
            Section::DebateContext,
            Section::ArcIntroduction,
            Section::JsonInstructions,
        ],
        (Debate, Continuation) => vec![Section::ModeRole, Section::DebateContext],
        (Discussion, Initial) => vec![
            Section::ModeRole,
            Section::RetryContext,
            Section::ArcIntroduction,
            Section::JsonInstructions,
        ],
        (Discussion, Continuation) => vec![Section::ModeRole, Section::RetryContext],
        (Alien, Initial) => vec![
            Section::ModeRole,
            Section::ArcIntroduction,
            Section::ModeTask,
            Section::JsonInstructions,
        ],
        (Alien, Continuation) => vec![Section::ModeRole, Section::ModeTask],
    }
}

fn build_system_prompt(ctx: &PromptContext, inputs: &AssemblyInputs) -> String {
    if ctx.mode == PromptMode::Custom {
        return inputs.custom_system_prompt.unwrap_or_default().to_string();
    }

    sections_for(ctx)
        .into_iter()
        .map(|section| {
            sections::render(
                section,
                ctx,
                inputs.original_explanation,
                inputs.previous_analysis,
                inputs.custom_challenge,
            )
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Training pairs + test cases rendered into the user turn. For
/// debate/discussion continuations the puzzle data is NOT re-sent — the
/// provider already holds it server-side.
fn build_user_prompt(ctx: &PromptContext, puzzle: &PuzzleInput, inputs: &AssemblyInputs) -> String {
    let is_refinement_continuation = matches!(ctx.mode, PromptMode::Debate | PromptMode::Discussion)
        && ctx.effective_state() == ConversationState::Continuation;

    if is_refinement_continuation {
        return match ctx.mode {
            PromptMode::Debate => {
                "Given the challenge above, provide your corrected explanation and prediction.".to_string()
            }
            _ => "Given your prior analysis above, provide your refined explanation and prediction.".to_string(),
        };
    }

    let mut out = String::new();
    if puzzle.train.is_empty() {
        // Boundary behavior 9: still produce a valid prompt, degraded.
        out.push_str("(No training examples were provided for this puzzle.)\n\n");
    }
    for (i, pair) in puzzle.train.iter().enumerate() {
        out.push_str(&format!(
            "Training example {}:\nInput:\n{}\nOutput:\n{}\n\n",
            i + 1,
            render(&pair.input, ctx.emoji_mode),
            render(&pair.output, ctx.emoji_mode)
        ));
    }

    for (i, case) in puzzle.test.iter().enumerate() {
        out.push_str(&format!(
            "Test {}:\nInput:\n{}\n",
            i + 1,
            render(&case.input, ctx.emoji_mode)
        ));
        if !inputs.omit_answer {
            if let Some(ref expected) = case.expected_output {
                out.push_str(&format!("Expected output:\n{}\n", render(expected, ctx.emoji_mode)));
            }
        }
        out.push('\n');
    }

    out
}

/// Deterministically builds `(systemPrompt, userPrompt)` from a
/// [`PromptContext`] and puzzle.
pub fn assemble(ctx: &PromptContext, puzzle: &PuzzleInput, inputs: &AssemblyInputs) -> AssembledPrompt {
    AssembledPrompt {
        system_prompt: build_system_prompt(ctx, inputs),
        user_prompt: build_user_prompt(ctx, puzzle, inputs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc_provider::{Grid, ProviderFamily, TestCase, TrainingPair};

    fn sample_puzzle() -> PuzzleInput {
        PuzzleInput {
            id: "00d62c1b".into(),
            train: vec![TrainingPair {
                input: Grid(vec![vec![0, 1]]),
                output: Grid(vec![vec![1, 0]]),
            }],
            test: vec![TestCase {
                input: Grid(vec![vec![0, 0]]),
                expected_output: Some(Grid(vec![vec![1, 1]])),
            }],
        }
    }

    #[test]
    fn solver_initial_includes_json_instructions() {
        let ctx = PromptContext {
            mode: PromptMode::Solver,
            state: ConversationState::Initial,
            provider_family: ProviderFamily::OpenAi,
            is_multi_test: false,
            has_original_explanation: false,
            has_previous_analysis: false,
            emoji_mode: false,
        };
        let prompt = assemble(&ctx, &sample_puzzle(), &AssemblyInputs::default());
        assert!(prompt.system_prompt.contains("JSON object"));
        assert!(prompt.user_prompt.contains("Training example 1"));
    }

    #[test]
    fn solver_continuation_omits_intro_and_json_instructions() {
        let ctx = PromptContext {
            mode: PromptMode::Solver,
            state: ConversationState::Continuation,
            provider_family: ProviderFamily::OpenAi,
            is_multi_test: false,
            has_original_explanation: false,
            has_previous_analysis: false,
            emoji_mode: false,
        };
        let prompt = assemble(&ctx, &sample_puzzle(), &AssemblyInputs::default());
        assert!(!prompt.system_prompt.contains("JSON object"));
        assert!(!prompt.system_prompt.contains("ARC-AGI puzzles present"));
    }

    #[test]
    fn no_native_chaining_always_gets_initial_pattern() {
        let ctx = PromptContext {
            mode: PromptMode::Solver,
            state: ConversationState::Continuation,
            provider_family: ProviderFamily::Anthropic,
            is_multi_test: false,
            has_original_explanation: false,
            has_previous_analysis: false,
            emoji_mode: false,
        };
        let prompt = assemble(&ctx, &sample_puzzle(), &AssemblyInputs::default());
        assert!(prompt.system_prompt.contains("JSON object"));
    }

    #[test]
    fn debate_continuation_does_not_resend_training_data() {
        let original = PriorExplanation {
            pattern_description: "flip".into(),
            solving_strategy: "mirror".into(),
            hints: vec![],
            confidence: 40,
        };
        let ctx = PromptContext {
            mode: PromptMode::Debate,
            state: ConversationState::Continuation,
            provider_family: ProviderFamily::OpenAi,
            is_multi_test: false,
            has_original_explanation: true,
            has_previous_analysis: false,
            emoji_mode: false,
        };
        let inputs = AssemblyInputs {
            original_explanation: Some(&original),
            ..Default::default()
        };
        let prompt = assemble(&ctx, &sample_puzzle(), &inputs);
        assert!(!prompt.user_prompt.contains("Training example"));
        assert!(prompt.system_prompt.contains("flip"));
    }

    #[test]
    fn empty_training_examples_still_produce_valid_prompt() {
        let mut puzzle = sample_puzzle();
        puzzle.train.clear();
        let ctx = PromptContext {
            mode: PromptMode::Solver,
            state: ConversationState::Initial,
            provider_family: ProviderFamily::OpenAi,
            is_multi_test: false,
            has_original_explanation: false,
            has_previous_analysis: false,
            emoji_mode: false,
        };
        let prompt = assemble(&ctx, &puzzle, &AssemblyInputs::default());
        assert!(prompt.user_prompt.contains("No training examples"));
    }
}
