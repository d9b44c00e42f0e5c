use super::events::{LogLevel, StreamEvent};
use super::session::SessionRegistry;
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
struct SessionContext {
    session_id: Uuid,
    registry: Arc<SessionRegistry>,
}

tokio::task_local! {
    static SESSION_CONTEXT: SessionContext;
}

/// Binds `session_id` to the current async call stack for the duration of
/// `body`. Anything `body` awaits,
/// directly or through further async calls, can reach this context via
/// [`emit`] / [`log_info`] / [`is_cancelled`] without an explicit session
/// parameter — the same way the orchestrator's callers don't thread a
/// logger through solver/adapter/parser call chains by hand.
pub async fn with_session<F, Fut, T>(session_id: Uuid, registry: Arc<SessionRegistry>, body: F) -> T
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    SESSION_CONTEXT
        .scope(SessionContext { session_id, registry }, body())
        .await
}

fn current() -> Option<SessionContext> {
    SESSION_CONTEXT.try_with(|c| c.clone()).ok()
}

/// Emits an event on the current session's bus, if one is bound. Outside a
/// session context this is a no-op — callers that run unconditionally (e.g.
/// library code exercised by unit tests) do not need to special-case it.
pub async fn emit(event: StreamEvent) {
    if let Some(ctx) = current() {
        ctx.registry.emit(ctx.session_id, event).await;
    }
}

/// Dual-writes to the process log and, if bound, broadcasts a `log` event
/// to the session's subscribers.
async fn log_dual(level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => log::debug!("{message}"),
        LogLevel::Info => log::info!("{message}"),
        LogLevel::Warn => log::warn!("{message}"),
        LogLevel::Error => log::error!("{message}"),
    }
    let context = current().map(|c| c.session_id.to_string()).unwrap_or_default();
    emit(StreamEvent::Log {
        level,
        context,
        message: message.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
    .await;
}

pub async fn log_info(message: &str) {
    log_dual(LogLevel::Info, message).await;
}

pub async fn log_warn(message: &str) {
    log_dual(LogLevel::Warn, message).await;
}

pub async fn log_error(message: &str) {
    log_dual(LogLevel::Error, message).await;
}

/// Cooperative cancellation check. Callers check this at each loop iteration
/// (Grover iterations, ARC-3 turns, retry attempts); outside a session
/// context nothing can be cancelled so this returns `false`.
pub async fn is_cancelled() -> bool {
    match current() {
        Some(ctx) => ctx.registry.is_cancelled(ctx.session_id).await,
        None => false,
    }
}

pub fn current_session_id() -> Option<Uuid> {
    current().map(|c| c.session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_outside_session_is_noop() {
        emit(StreamEvent::StreamEnd { reason: "x".into() }).await;
    }

    #[tokio::test]
    async fn emit_inside_session_reaches_subscriber() {
        let registry = Arc::new(SessionRegistry::new());
        let (id, mut rx) = registry.register().await;
        with_session(id, registry.clone(), || async {
            log_info("hello").await;
        })
        .await;
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, StreamEvent::Log { .. }));
    }

    #[tokio::test]
    async fn cancellation_is_visible_inside_session() {
        let registry = Arc::new(SessionRegistry::new());
        let (id, _rx) = registry.register().await;
        registry.cancel(id).await;
        let cancelled = with_session(id, registry.clone(), || async { is_cancelled().await }).await;
        assert!(cancelled);
    }
}
