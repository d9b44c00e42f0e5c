use super::context::PromptContext;
use arc_provider::{PriorExplanation, PromptMode};

/// Named system-prompt building blocks. Each function renders its block
/// independently; `assemble` picks which ones to concatenate per the
/// pattern table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    ArcIntroduction,
    ModeRole,
    ModeTask,
    JsonInstructions,
    DebateContext,
    RetryContext,
}

pub fn arc_introduction() -> String {
    "ARC-AGI puzzles present a small number of paired example grids, each an input \
    transformed into an output by one consistent rule. Every cell is a small integer \
    representing a color. Your job is to infer the rule from the training pairs and \
    apply it to the test input(s)."
        .to_string()
}

pub fn mode_role(mode: PromptMode) -> String {
    match mode {
        PromptMode::Debate => {
            "You are challenging another AI's incorrect explanation of this puzzle. \
            Identify what it got wrong and propose a better account of the transformation rule."
                .to_string()
        }
        PromptMode::Discussion => {
            "You are refining your own prior explanation of this puzzle in light of \
            new scrutiny. Reconsider your reasoning and either defend or revise it."
                .to_string()
        }
        PromptMode::Alien => {
            "You are an alien intelligence that communicates only in colored symbols. \
            Reason about the transformation the way your species would."
                .to_string()
        }
        _ => String::new(),
    }
}

pub fn mode_task(mode: PromptMode, is_multi_test: bool) -> String {
    let base = match mode {
        PromptMode::Solver | PromptMode::Explanation => {
            "Determine the transformation rule and predict the output grid(s) for the test input(s)."
        }
        PromptMode::Debate => "Produce your own corrected prediction and explanation.",
        PromptMode::Discussion => "Produce a revised prediction and explanation.",
        PromptMode::Gepa => "Produce a prediction optimized for downstream automated grading.",
        PromptMode::Custom => "Follow the custom instructions supplied for this session.",
        PromptMode::Alien => "Predict the output grid(s), rendering cells with the provided symbol palette.",
    };
    if is_multi_test {
        format!("{base} This puzzle has multiple test cases — predict all of them.")
    } else {
        base.to_string()
    }
}

pub fn json_instructions(is_multi_test: bool) -> String {
    let mut s = String::from(
        "Respond with a single JSON object containing: patternDescription (string), \
        solvingStrategy (string), hints (array of strings), confidence (integer 1-100), ",
    );
    if is_multi_test {
        s.push_str(
            "multiplePredictedOutputs: true, and predictedOutput1 through predictedOutputN \
            (one 2D integer array per test case, in order).",
        );
    } else {
        s.push_str("and predictedOutput (a 2D array of integers).");
    }
    s
}

pub fn debate_context(original: &PriorExplanation, custom_challenge: Option<&str>) -> String {
    let mut s = format!(
        "The explanation being challenged:\nPattern: {}\nStrategy: {}\nHints: {}\nConfidence: {}\n",
        original.pattern_description,
        original.solving_strategy,
        original.hints.join("; "),
        original.confidence
    );
    if let Some(challenge) = custom_challenge {
        s.push_str(&format!("\nHuman-provided challenge: {challenge}\n"));
    }
    s
}

pub fn retry_context(previous: &PriorExplanation) -> String {
    format!(
        "Your previous analysis:\nPattern: {}\nStrategy: {}\nHints: {}\nConfidence: {}\n\
        Reconsider this in light of any new information and refine it.",
        previous.pattern_description,
        previous.solving_strategy,
        previous.hints.join("; "),
        previous.confidence
    )
}

pub fn render(section: Section, ctx: &PromptContext, original: Option<&PriorExplanation>, previous: Option<&PriorExplanation>, custom_challenge: Option<&str>) -> String {
    match section {
        Section::ArcIntroduction => arc_introduction(),
        Section::ModeRole => mode_role(ctx.mode),
        Section::ModeTask => mode_task(ctx.mode, ctx.is_multi_test),
        Section::JsonInstructions => json_instructions(ctx.is_multi_test),
        Section::DebateContext => original
            .map(|o| debate_context(o, custom_challenge))
            .unwrap_or_default(),
        Section::RetryContext => previous.map(retry_context).unwrap_or_default(),
    }
}
