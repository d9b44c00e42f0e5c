use crate::error::to_core_error;
use arc_core::CoreError;
use sqlx::{PgPool, Row};

/// Bookkeeping for a static dataset ingestion pass. The run record lives in
/// the same store as everything else the ingestion pass populates.
pub struct IngestionRunStore {
    pool: PgPool,
}

impl IngestionRunStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn start(&self, dataset: &str) -> Result<i64, CoreError> {
        let row = sqlx::query("INSERT INTO ingestion_runs (dataset, puzzle_count) VALUES ($1, 0) RETURNING id")
            .bind(dataset)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| to_core_error("start_ingestion_run", e))?;

        row.try_get("id").map_err(|e| to_core_error("start_ingestion_run id", e))
    }

    pub async fn complete(&self, run_id: i64, puzzle_count: u32) -> Result<(), CoreError> {
        sqlx::query("UPDATE ingestion_runs SET puzzle_count = $1, completed_at = now(), status = 'complete' WHERE id = $2")
            .bind(puzzle_count as i32)
            .bind(run_id)
            .execute(&self.pool)
            .await
            .map_err(|e| to_core_error("complete_ingestion_run", e))?;

        Ok(())
    }

    pub async fn fail(&self, run_id: i64, error: &str) -> Result<(), CoreError> {
        sqlx::query("UPDATE ingestion_runs SET completed_at = now(), status = 'failed', error = $1 WHERE id = $2")
            .bind(error)
            .bind(run_id)
            .execute(&self.pool)
            .await
            .map_err(|e| to_core_error("fail_ingestion_run", e))?;

        Ok(())
    }
}
