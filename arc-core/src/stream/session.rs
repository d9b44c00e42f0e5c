use super::events::StreamEvent;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

/// Bounded so a stalled subscriber cannot grow memory unbounded. Oldest
/// events are dropped on overflow and a warning event is injected in their
/// place.
pub const QUEUE_CAPACITY: usize = 500;
const SESSION_TTL_MINUTES: i64 = 15;

/// One subscriber's channel plus bookkeeping.
pub struct StreamingSession {
    pub session_id: Uuid,
    sender: mpsc::Sender<StreamEvent>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    cancelled: bool,
}

impl StreamingSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.last_activity > ChronoDuration::minutes(SESSION_TTL_MINUTES)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Process-wide map of session-id → subscriber. Guarded by a
/// `tokio::sync::Mutex` rather than a lock-free structure —
/// the single-threaded-per-task scheduling model means there is
/// never meaningful lock contention here, only ownership bookkeeping.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<StreamingSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new session and returns its id plus the receiving half of
    /// the event channel, handed to the HTTP layer (SSE stream or WS
    /// upgrade).
    pub async fn register(&self) -> (Uuid, mpsc::Receiver<StreamEvent>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let session_id = Uuid::new_v4();
        let now = Utc::now();
        let session = StreamingSession {
            session_id,
            sender: tx,
            created_at: now,
            last_activity: now,
            cancelled: false,
        };
        self.sessions
            .lock()
            .await
            .insert(session_id, Arc::new(Mutex::new(session)));
        (session_id, rx)
    }

    /// Emits an event to a session, applying backpressure (await the
    /// channel's own buffering) and dropping-with-warning on overflow rather
    /// than blocking forever.
    pub async fn emit(&self, session_id: Uuid, event: StreamEvent) {
        let Some(session) = self.sessions.lock().await.get(&session_id).cloned() else {
            return;
        };
        let mut guard = session.lock().await;
        guard.last_activity = Utc::now();
        match guard.sender.try_send(event.clone()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!("streaming session {session_id} buffer full, dropping oldest");
                let _ = guard.sender.try_send(StreamEvent::Log {
                    level: super::events::LogLevel::Warn,
                    context: "stream".into(),
                    message: "event buffer overflowed, some events were dropped".into(),
                    timestamp: Utc::now().to_rfc3339(),
                });
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::debug!("streaming session {session_id} subscriber gone, dropping event");
            }
        }
    }

    pub async fn cancel(&self, session_id: Uuid) {
        if let Some(session) = self.sessions.lock().await.get(&session_id).cloned() {
            session.lock().await.cancelled = true;
        }
    }

    pub async fn is_cancelled(&self, session_id: Uuid) -> bool {
        match self.sessions.lock().await.get(&session_id).cloned() {
            Some(session) => session.lock().await.is_cancelled(),
            None => true,
        }
    }

    pub async fn unregister(&self, session_id: Uuid) {
        self.sessions.lock().await.remove(&session_id);
    }

    /// Sweeps TTL-expired sessions, emitting `stream.end` to each before
    /// dropping it.
    pub async fn evict_expired(&self) {
        let now = Utc::now();
        let expired: Vec<Uuid> = {
            let sessions = self.sessions.lock().await;
            let mut ids = Vec::new();
            for (id, session) in sessions.iter() {
                if session.lock().await.is_expired(now) {
                    ids.push(*id);
                }
            }
            ids
        };
        for id in expired {
            self.emit(id, StreamEvent::StreamEnd { reason: "expired".into() }).await;
            self.unregister(id).await;
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Signals every live session to wind down: marks each cancelled so
    /// in-progress loops stop at their next checkpoint, and emits a
    /// `stream.end{reason: "shutdown"}` to each subscriber immediately
    /// rather than waiting for that checkpoint to be reached.
    pub async fn cancel_all(&self) {
        let ids: Vec<Uuid> = self.sessions.lock().await.keys().copied().collect();
        for id in ids {
            self.cancel(id).await;
            self.emit(id, StreamEvent::StreamEnd { reason: "shutdown".into() }).await;
        }
    }

    #[cfg(test)]
    pub async fn force_expire(&self, session_id: Uuid) {
        if let Some(session) = self.sessions.lock().await.get(&session_id).cloned() {
            let mut guard = session.lock().await;
            guard.last_activity = guard.created_at - ChronoDuration::minutes(SESSION_TTL_MINUTES + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_then_emit_is_received() {
        let registry = SessionRegistry::new();
        let (id, mut rx) = registry.register().await;
        registry
            .emit(id, StreamEvent::StreamInit { session_id: id.to_string() })
            .await;
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, StreamEvent::StreamInit { .. }));
    }

    #[tokio::test]
    async fn cancel_flag_is_observable() {
        let registry = SessionRegistry::new();
        let (id, _rx) = registry.register().await;
        assert!(!registry.is_cancelled(id).await);
        registry.cancel(id).await;
        assert!(registry.is_cancelled(id).await);
    }

    #[tokio::test]
    async fn expired_session_is_swept_with_stream_end() {
        let registry = SessionRegistry::new();
        let (id, mut rx) = registry.register().await;
        registry.force_expire(id).await;
        registry.evict_expired().await;
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, StreamEvent::StreamEnd { .. }));
        assert_eq!(registry.session_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_session_emit_is_a_noop() {
        let registry = SessionRegistry::new();
        registry
            .emit(Uuid::new_v4(), StreamEvent::StreamEnd { reason: "x".into() })
            .await;
    }
}
