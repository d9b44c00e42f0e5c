use crate::amplify::{render_context, AMPLIFY_TOP_K};
use crate::extract::extract_python_blocks;
use crate::grade::{execute_against, grade_program};
use crate::prompt::{continuation_system_prompt, initial_system_prompt};
use arc_core::{puzzle::Puzzle, stream, GroverIteration, GroverProgramResult};
use arc_provider::{AnalyzeOptions, Grid, PromptMode, ProviderAdapter, ProviderError};

const DEFAULT_MAX_ITERATIONS: u32 = 5;
const PERFECT_SCORE: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct GroverResult {
    pub iterations: Vec<GroverIteration>,
    pub best_program: Option<String>,
    pub predicted_output: Option<Grid>,
    pub multi_test_prediction_grids: Option<Vec<Option<Grid>>>,
    pub last_response_id: Option<String>,
}

/// Runs the Grover iterative code-search loop for one puzzle
/// against one model. `max_iterations = 0` returns immediately with an
/// empty result.
pub async fn run_grover(
    puzzle: &Puzzle,
    adapter: &dyn ProviderAdapter,
    model_key: &str,
    temperature: f32,
    max_iterations: u32,
    user_api_key: Option<String>,
) -> Result<GroverResult, ProviderError> {
    let max_iterations = if max_iterations == 0 { 0 } else { max_iterations.max(1).min(50) };
    if max_iterations == 0 {
        return Ok(GroverResult {
            iterations: vec![],
            best_program: None,
            predicted_output: None,
            multi_test_prediction_grids: None,
            last_response_id: None,
        });
    }

    let mut iterations: Vec<GroverIteration> = Vec::new();
    let mut kept: Vec<(u32, GroverProgramResult)> = Vec::new();
    let mut previous_response_id: Option<String> = None;
    let mut best: Option<GroverProgramResult> = None;

    'outer: for iteration in 0..max_iterations {
        if stream::is_cancelled().await {
            break;
        }

        let system_prompt = if iteration == 0 {
            initial_system_prompt(&puzzle.train)
        } else {
            continuation_system_prompt(&render_context(&kept))
        };
        let user_prompt = if iteration == 0 {
            "Produce your first candidate program(s) now.".to_string()
        } else {
            "Produce refined candidate program(s) now.".to_string()
        };

        stream::emit(stream::StreamEvent::Progress {
            phase: "prompt_sent".into(),
            iteration: Some(iteration),
            payload: serde_json::json!({ "preview": system_prompt.chars().take(200).collect::<String>(), "length": system_prompt.len() }),
        })
        .await;

        let options = AnalyzeOptions {
            previous_response_id: previous_response_id.clone(),
            user_api_key: user_api_key.clone(),
            ..Default::default()
        };

        let response = adapter
            .analyze(
                &puzzle.to_input(),
                model_key,
                temperature,
                PromptMode::Gepa,
                &system_prompt,
                &user_prompt,
                &options,
            )
            .await?;

        previous_response_id = response.provider_response_id.clone();

        stream::emit(stream::StreamEvent::Progress {
            phase: "llm_response_received".into(),
            iteration: Some(iteration),
            payload: serde_json::json!({
                "inputTokens": response.usage.input_tokens,
                "outputTokens": response.usage.output_tokens,
            }),
        })
        .await;

        let blocks = extract_python_blocks(&response.raw_text);

        stream::emit(stream::StreamEvent::Progress {
            phase: "programs_extracted".into(),
            iteration: Some(iteration),
            payload: serde_json::json!({
                "count": blocks.len(),
                "programs": blocks.iter().map(|b| serde_json::json!({"code": b, "lines": b.lines().count()})).collect::<Vec<_>>(),
            }),
        })
        .await;

        let mut graded = Vec::with_capacity(blocks.len());
        for code in &blocks {
            let result = grade_program(code, &puzzle.train).await;
            graded.push(result);
        }

        stream::emit(stream::StreamEvent::Progress {
            phase: "execution_complete".into(),
            iteration: Some(iteration),
            payload: serde_json::json!({
                "results": graded.iter().map(|g| serde_json::json!({"score": g.score, "error": g.error})).collect::<Vec<_>>(),
            }),
        })
        .await;

        for program in &graded {
            if best.as_ref().map(|b| program.score > b.score).unwrap_or(true) {
                best = Some(program.clone());
            }
        }

        let terminate_early = graded.iter().any(|p| p.score >= PERFECT_SCORE);
        iterations.push(GroverIteration { programs: graded.clone() });

        let mut tagged: Vec<(u32, GroverProgramResult)> = kept
            .drain(..)
            .chain(graded.into_iter().map(|p| (iteration, p)))
            .collect();
        tagged.sort_by(|a, b| a.1.score.partial_cmp(&b.1.score).unwrap_or(std::cmp::Ordering::Equal));
        let keep_from = tagged.len().saturating_sub(AMPLIFY_TOP_K.min(tagged.len()));
        kept = tagged.split_off(keep_from);

        if terminate_early {
            break 'outer;
        }
    }

    let (predicted_output, multi_test_prediction_grids) = if let Some(ref program) = best {
        if puzzle.is_multi_test() {
            let mut grids = Vec::with_capacity(puzzle.test.len());
            for case in &puzzle.test {
                grids.push(execute_against(&program.code, &case.input).await);
            }
            (None, Some(grids))
        } else if let Some(case) = puzzle.test.first() {
            (execute_against(&program.code, &case.input).await, None)
        } else {
            (None, None)
        }
    } else {
        (None, None)
    };

    Ok(GroverResult {
        iterations,
        best_program: best.map(|p| p.code),
        predicted_output,
        multi_test_prediction_grids,
        last_response_id: previous_response_id,
    })
}
