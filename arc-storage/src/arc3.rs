use crate::codec::json_to_text;
use crate::error::to_core_error;
use arc_arc3::GameFrame;
use arc_core::CoreError;
use sqlx::PgPool;

/// Persists ARC-3 session/frame rows: every unpacked frame is appended to
/// `arc3_frames` as it arrives, and the session row tracks lifecycle state
/// plus the terminal score once the run ends. Kept separate from
/// [`crate::explanations::PgExplanationRepository`] since it is consumed
/// directly by `arc-server`'s streaming handlers rather than through the
/// `ExplanationRepository` trait boundary.
pub struct Arc3SessionStore {
    pool: PgPool,
}

impl Arc3SessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn open_session(&self, session_id: &str, game_id: &str, model_key: &str, card_id: &str) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            INSERT INTO arc3_sessions (session_id, game_id, model_key, card_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session_id)
        .bind(game_id)
        .bind(model_key)
        .bind(card_id)
        .execute(&self.pool)
        .await
        .map_err(|e| to_core_error("open_session", e))?;

        Ok(())
    }

    pub async fn update_guid(&self, session_id: &str, guid: &str) -> Result<(), CoreError> {
        sqlx::query("UPDATE arc3_sessions SET guid = $1, updated_at = now() WHERE session_id = $2")
            .bind(guid)
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| to_core_error("update_guid", e))?;

        Ok(())
    }

    pub async fn close_session(
        &self,
        session_id: &str,
        status: &str,
        final_score: Option<i64>,
        win_score: Option<i64>,
        total_frames: Option<i32>,
    ) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            UPDATE arc3_sessions
            SET status = $1, final_score = $2, win_score = $3, total_frames = $4,
                ended_at = now(), updated_at = now()
            WHERE session_id = $5
            "#,
        )
        .bind(status)
        .bind(final_score)
        .bind(win_score)
        .bind(total_frames)
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(|e| to_core_error("close_session", e))?;

        Ok(())
    }

    pub async fn append_frame(&self, session_id: &str, frame: &GameFrame) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            INSERT INTO arc3_frames (
                session_id, frame_number, layers, state, score,
                is_animation, animation_frame, animation_total_frames,
                is_last_animation_frame, available_actions
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(session_id)
        .bind(frame.frame_number as i32)
        .bind(json_to_text(&frame.layers))
        .bind(&frame.state)
        .bind(frame.score)
        .bind(frame.is_animation)
        .bind(frame.animation_frame.map(|n| n as i32))
        .bind(frame.animation_total_frames.map(|n| n as i32))
        .bind(frame.is_last_animation_frame)
        .bind(frame.available_actions.as_ref().map(json_to_text))
        .execute(&self.pool)
        .await
        .map_err(|e| to_core_error("append_frame", e))?;

        Ok(())
    }
}
