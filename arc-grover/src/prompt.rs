use arc_provider::TrainingPair;

fn render_pairs(train: &[TrainingPair]) -> String {
    train
        .iter()
        .enumerate()
        .map(|(i, pair)| {
            format!(
                "Training example {}:\ninput = {}\nexpected_output = {}\n",
                i + 1,
                serde_json::to_string(&pair.input.0).unwrap_or_default(),
                serde_json::to_string(&pair.output.0).unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Iteration 0 system prompt: puzzle training examples plus the
/// code-synthesis task directive.
pub fn initial_system_prompt(train: &[TrainingPair]) -> String {
    format!(
        "You are solving an ARC-AGI puzzle by writing Python programs. \
        Each program must define a function `solve(input)` that takes a grid \
        (a list of lists of integers) and returns the transformed grid in the \
        same shape.\n\n{}\n\nWrite one or more candidate `solve` functions as \
        fenced ```python code blocks. Do not include anything else in a code \
        block other than the function definition(s).",
        render_pairs(train)
    )
}

/// Continuation system prompt: references previous best programs and their
/// scores, requests refined programs.
pub fn continuation_system_prompt(amplified_context: &str) -> String {
    format!(
        "{amplified_context}\n\nWrite improved `solve(input)` candidates as fenced ```python code blocks."
    )
}
