use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

/// `GET /api/health` — liveness/readiness probe: checks the database
/// connection and reports the count of active streaming sessions.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database_ok = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    Json(json!({
        "status": if database_ok { "ok" } else { "degraded" },
        "database": database_ok,
        "activeStreamingSessions": state.streams.session_count().await,
    }))
}
