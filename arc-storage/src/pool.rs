use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Bounded around 20 connections so a burst of concurrent analyze calls
/// can't exhaust the database's own connection limit.
const MAX_CONNECTIONS: u32 = 20;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens the pool and runs pending migrations. Called once at process
/// startup by `arc-server`'s `main`.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
