use crate::error::to_core_error;
use arc_core::CoreError;
use sqlx::PgPool;

/// User feedback on one explanation: thumbs up/down plus an optional
/// comment.
pub struct FeedbackStore {
    pool: PgPool,
}

impl FeedbackStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, explanation_id: i64, vote: &str, comment: Option<&str>) -> Result<(), CoreError> {
        sqlx::query("INSERT INTO feedback (explanation_id, vote, comment) VALUES ($1, $2, $3)")
            .bind(explanation_id)
            .bind(vote)
            .bind(comment)
            .execute(&self.pool)
            .await
            .map_err(|e| to_core_error("record_feedback", e))?;

        Ok(())
    }
}
