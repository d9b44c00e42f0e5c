use arc_core::GroverProgramResult;
use arc_provider::{Grid, TrainingPair};
use arc_sandbox::{SandboxError, SandboxPurpose};

/// Runs one candidate `solve(grid)` program against every training pair and
/// scores it as the fraction of pairs it reproduces exactly, scaled to
/// [0, 10]. A program that raises on any pair scores 0 and its error is
/// captured rather than the loop aborting.
pub async fn grade_program(code: &str, train: &[TrainingPair]) -> GroverProgramResult {
    if train.is_empty() {
        return GroverProgramResult { code: code.to_string(), score: 0.0, error: Some("no training examples to grade against".into()) };
    }

    let mut matches = 0usize;
    let mut first_error: Option<String> = None;

    for pair in train {
        match run_one(code, &pair.input).await {
            Ok(output) => {
                if output == pair.output {
                    matches += 1;
                }
            }
            Err(e) => {
                first_error.get_or_insert_with(|| e.to_string());
            }
        }
    }

    let score = if first_error.is_some() && matches == 0 {
        0.0
    } else {
        (matches as f64 / train.len() as f64) * 10.0
    };

    GroverProgramResult { code: code.to_string(), score, error: first_error }
}

/// Executes `code` against each TEST input, returning whatever the sandbox
/// produced (or `None` on any failure — predictions from a failing program
/// are not scoreable).
pub async fn execute_against(code: &str, input: &Grid) -> Option<Grid> {
    run_one(code, input).await.ok()
}

async fn run_one(code: &str, input: &Grid) -> Result<Grid, SandboxError> {
    let context = serde_json::json!({ "input": input.0 });
    let source = format!("{code}\nresult = solve(input)\n");
    let output = arc_sandbox::run(&source, &context, SandboxPurpose::GroverProgram).await?;
    let rows: Vec<Vec<i32>> = serde_json::from_str(&output.stdout)
        .map_err(|e| SandboxError::Runtime(format!("program output was not a JSON grid: {e}")))?;
    Ok(Grid(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_training_set_scores_zero() {
        let result = tokio_test_block(grade_program("def solve(grid):\n    return grid", &[]));
        assert_eq!(result.score, 0.0);
    }

    fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f)
    }
}
