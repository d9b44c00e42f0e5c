use crate::codec::{enum_to_text, enum_to_text_opt, json_to_text, text_to_enum, text_to_enum_opt, text_to_json, text_to_json_opt};
use crate::error::to_core_error;
use arc_core::analysis::{Explanation, GroverIteration, NewExplanation};
use arc_core::repository::ExplanationRepository;
use arc_core::CoreError;
use arc_provider::grid::{sanitize_optional, Grid};
use arc_provider::{AnalysisStatus, PromptMode, ReasoningEffort, ReasoningSummary, ReasoningVerbosity};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PgExplanationRepository {
    pool: PgPool,
}

impl PgExplanationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Explanations with a non-null `provider_response_id` created within
    /// the discussion-chaining retention window (30 days). The provider is
    /// the final arbiter if the window has actually closed server-side —
    /// this pre-filters the obvious case rather than enforcing it strictly.
    pub async fn list_discussion_eligible(&self) -> Result<Vec<Explanation>, CoreError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM explanations
            WHERE provider_response_id IS NOT NULL
              AND created_at >= now() - interval '30 days'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| to_core_error("list_discussion_eligible", e))?;

        rows.iter().map(row_to_explanation).collect()
    }

    /// Backing query for `/api/model-dataset/performance/:modelName/:datasetName`
    ///: every explanation for the model joined against the puzzle's
    /// dataset, split by correctness.
    pub async fn list_for_model_and_dataset(&self, model_key: &str, dataset: &str) -> Result<Vec<Explanation>, CoreError> {
        let rows = sqlx::query(
            r#"
            SELECT e.* FROM explanations e
            JOIN puzzles p ON p.id = e.puzzle_id
            WHERE e.model_key = $1 AND p.dataset = $2
            ORDER BY e.created_at ASC
            "#,
        )
        .bind(model_key)
        .bind(dataset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| to_core_error("list_for_model_and_dataset", e))?;

        rows.iter().map(row_to_explanation).collect()
    }
}

#[async_trait]
impl ExplanationRepository for PgExplanationRepository {
    async fn save_explanation(&self, new: NewExplanation) -> Result<Explanation, CoreError> {
        let predicted_output = new.predicted_output.as_ref().map(json_to_text);
        let multi_test = new.multi_test_prediction_grids.as_ref().map(json_to_text);
        let grover_iterations = new.grover_iterations.as_ref().map(json_to_text);

        let inserted_id: Option<i64> = sqlx::query(
            r#"
            INSERT INTO explanations (
                puzzle_id, model_key, prompt_mode, temperature,
                reasoning_effort, reasoning_verbosity, reasoning_summary,
                input_tokens, output_tokens, reasoning_tokens, total_tokens, cost_usd,
                predicted_output, multi_test_prediction_grids,
                is_prediction_correct, multi_test_all_correct, per_test_correctness,
                confidence, pattern_description, solving_strategy, hints,
                provider_response_id, rebutting_explanation_id,
                status, incomplete_reason,
                grover_iteration_count, grover_iterations, grover_best_program,
                system_prompt, user_prompt, provider_raw_response
            ) VALUES (
                $1, $2, $3, $4,
                $5, $6, $7,
                $8, $9, $10, $11, $12,
                $13, $14,
                $15, $16, $17,
                $18, $19, $20, $21,
                $22, $23,
                $24, $25,
                $26, $27, $28,
                $29, $30, $31
            )
            ON CONFLICT (puzzle_id, model_key, provider_response_id) WHERE provider_response_id IS NOT NULL
            DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&new.puzzle_id)
        .bind(&new.model_key)
        .bind(enum_to_text(&new.prompt_mode))
        .bind(new.temperature)
        .bind(enum_to_text_opt(&new.reasoning_effort))
        .bind(enum_to_text_opt(&new.reasoning_verbosity))
        .bind(enum_to_text_opt(&new.reasoning_summary))
        .bind(new.input_tokens as i32)
        .bind(new.output_tokens as i32)
        .bind(new.reasoning_tokens as i32)
        .bind(new.total_tokens as i32)
        .bind(new.cost_usd)
        .bind(&predicted_output)
        .bind(&multi_test)
        .bind(new.is_prediction_correct)
        .bind(new.multi_test_all_correct)
        .bind(json_to_text(&new.per_test_correctness))
        .bind(new.confidence as i16)
        .bind(&new.pattern_description)
        .bind(&new.solving_strategy)
        .bind(json_to_text(&new.hints))
        .bind(&new.provider_response_id)
        .bind(new.rebutting_explanation_id)
        .bind(enum_to_text(&new.status))
        .bind(&new.incomplete_reason)
        .bind(new.grover_iteration_count.map(|n| n as i32))
        .bind(&grover_iterations)
        .bind(&new.grover_best_program)
        .bind(&new.system_prompt)
        .bind(&new.user_prompt)
        .bind(json_to_text(&new.provider_raw_response))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| to_core_error("save_explanation insert", e))?
        .map(|row| row.get::<i64, _>("id"));

        let id = match inserted_id {
            Some(id) => id,
            None => {
                // Conflict on the idempotency key: the row already exists,
                // return it as-is rather than inserting a duplicate.
                let existing = sqlx::query(
                    r#"
                    SELECT id FROM explanations
                    WHERE puzzle_id = $1 AND model_key = $2 AND provider_response_id = $3
                    "#,
                )
                .bind(&new.puzzle_id)
                .bind(&new.model_key)
                .bind(&new.provider_response_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| to_core_error("save_explanation idempotent lookup", e))?;
                existing.get::<i64, _>("id")
            }
        };

        self.get_explanation(id)
            .await?
            .ok_or_else(|| CoreError::Persistence(format!("explanation {id} vanished immediately after save")))
    }

    async fn get_explanation(&self, id: i64) -> Result<Option<Explanation>, CoreError> {
        let row = sqlx::query("SELECT * FROM explanations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| to_core_error("get_explanation", e))?;

        row.as_ref().map(row_to_explanation).transpose()
    }

    async fn list_for_puzzle(&self, puzzle_id: &str) -> Result<Vec<Explanation>, CoreError> {
        let rows = sqlx::query("SELECT * FROM explanations WHERE puzzle_id = $1 ORDER BY created_at ASC")
            .bind(puzzle_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| to_core_error("list_for_puzzle", e))?;

        rows.iter().map(row_to_explanation).collect()
    }

    async fn find_by_provider_response_id(&self, id: &str) -> Result<Option<Explanation>, CoreError> {
        let row = sqlx::query("SELECT * FROM explanations WHERE provider_response_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| to_core_error("find_by_provider_response_id", e))?;

        row.as_ref().map(row_to_explanation).transpose()
    }
}

fn parse_enum_field<T: serde::de::DeserializeOwned>(row: &sqlx::postgres::PgRow, field: &'static str) -> Result<T, CoreError> {
    let text: String = row.try_get(field).map_err(|e| to_core_error(field, e))?;
    text_to_enum(&text).map_err(|e| CoreError::Persistence(format!("{field}: {e}")))
}

fn row_to_explanation(row: &sqlx::postgres::PgRow) -> Result<Explanation, CoreError> {
    let prompt_mode: PromptMode = parse_enum_field(row, "prompt_mode")?;
    let status: AnalysisStatus = parse_enum_field(row, "status")?;

    let reasoning_effort: Option<ReasoningEffort> =
        text_to_enum_opt(row.try_get("reasoning_effort").map_err(|e| to_core_error("reasoning_effort", e))?)
            .map_err(|e| CoreError::Persistence(e.to_string()))?;
    let reasoning_verbosity: Option<ReasoningVerbosity> =
        text_to_enum_opt(row.try_get("reasoning_verbosity").map_err(|e| to_core_error("reasoning_verbosity", e))?)
            .map_err(|e| CoreError::Persistence(e.to_string()))?;
    let reasoning_summary: Option<ReasoningSummary> =
        text_to_enum_opt(row.try_get("reasoning_summary").map_err(|e| to_core_error("reasoning_summary", e))?)
            .map_err(|e| CoreError::Persistence(e.to_string()))?;

    let predicted_output_text: Option<String> = row.try_get("predicted_output").map_err(|e| to_core_error("predicted_output", e))?;
    let predicted_output = sanitize_optional(text_to_json_opt::<Grid>(predicted_output_text));

    let multi_test_text: Option<String> = row.try_get("multi_test_prediction_grids").map_err(|e| to_core_error("multi_test_prediction_grids", e))?;
    let multi_test_prediction_grids = text_to_json_opt::<Vec<Option<Grid>>>(multi_test_text)
        .map(|grids| grids.into_iter().map(sanitize_optional).collect());

    let per_test_correctness_text: String = row.try_get("per_test_correctness").map_err(|e| to_core_error("per_test_correctness", e))?;
    let hints_text: String = row.try_get("hints").map_err(|e| to_core_error("hints", e))?;
    let grover_iterations_text: Option<String> = row.try_get("grover_iterations").map_err(|e| to_core_error("grover_iterations", e))?;
    let provider_raw_response_text: String = row.try_get("provider_raw_response").map_err(|e| to_core_error("provider_raw_response", e))?;

    Ok(Explanation {
        id: row.try_get("id").map_err(|e| to_core_error("id", e))?,
        puzzle_id: row.try_get("puzzle_id").map_err(|e| to_core_error("puzzle_id", e))?,
        model_key: row.try_get("model_key").map_err(|e| to_core_error("model_key", e))?,
        prompt_mode,
        temperature: row.try_get("temperature").map_err(|e| to_core_error("temperature", e))?,
        reasoning_effort,
        reasoning_verbosity,
        reasoning_summary,
        input_tokens: row.try_get::<i32, _>("input_tokens").map_err(|e| to_core_error("input_tokens", e))? as u32,
        output_tokens: row.try_get::<i32, _>("output_tokens").map_err(|e| to_core_error("output_tokens", e))? as u32,
        reasoning_tokens: row.try_get::<i32, _>("reasoning_tokens").map_err(|e| to_core_error("reasoning_tokens", e))? as u32,
        total_tokens: row.try_get::<i32, _>("total_tokens").map_err(|e| to_core_error("total_tokens", e))? as u32,
        cost_usd: row.try_get("cost_usd").map_err(|e| to_core_error("cost_usd", e))?,
        predicted_output,
        multi_test_prediction_grids,
        is_prediction_correct: row.try_get("is_prediction_correct").map_err(|e| to_core_error("is_prediction_correct", e))?,
        multi_test_all_correct: row.try_get("multi_test_all_correct").map_err(|e| to_core_error("multi_test_all_correct", e))?,
        per_test_correctness: text_to_json(&per_test_correctness_text),
        confidence: row.try_get::<i16, _>("confidence").map_err(|e| to_core_error("confidence", e))? as u8,
        pattern_description: row.try_get("pattern_description").map_err(|e| to_core_error("pattern_description", e))?,
        solving_strategy: row.try_get("solving_strategy").map_err(|e| to_core_error("solving_strategy", e))?,
        hints: text_to_json(&hints_text),
        provider_response_id: row.try_get("provider_response_id").map_err(|e| to_core_error("provider_response_id", e))?,
        rebutting_explanation_id: row.try_get("rebutting_explanation_id").map_err(|e| to_core_error("rebutting_explanation_id", e))?,
        status,
        incomplete_reason: row.try_get("incomplete_reason").map_err(|e| to_core_error("incomplete_reason", e))?,
        grover_iteration_count: row
            .try_get::<Option<i32>, _>("grover_iteration_count")
            .map_err(|e| to_core_error("grover_iteration_count", e))?
            .map(|n| n as u32),
        grover_iterations: text_to_json_opt::<Vec<GroverIteration>>(grover_iterations_text),
        grover_best_program: row.try_get("grover_best_program").map_err(|e| to_core_error("grover_best_program", e))?,
        system_prompt: row.try_get("system_prompt").map_err(|e| to_core_error("system_prompt", e))?,
        user_prompt: row.try_get("user_prompt").map_err(|e| to_core_error("user_prompt", e))?,
        provider_raw_response: text_to_json(&provider_raw_response_text),
        created_at: row.try_get("created_at").map_err(|e| to_core_error("created_at", e))?,
    })
}
