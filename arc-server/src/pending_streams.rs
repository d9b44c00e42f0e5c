use arc_core::stream::StreamEvent;
use std::collections::HashMap;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

/// Bridges the two-phase "prepare, then subscribe" flow `/api/arc3/stream/*`
/// and the Grover WebSocket endpoint share: the prepare/submit
/// handler registers a session and stashes its receiver here; the later SSE
/// or WebSocket handler takes it out once the client actually connects.
/// Separate from [`arc_core::stream::SessionRegistry`], which only hands the
/// receiver back once, at `register()` time.
#[derive(Default)]
pub struct PendingStreams {
    receivers: Mutex<HashMap<Uuid, mpsc::Receiver<StreamEvent>>>,
}

impl PendingStreams {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session_id: Uuid, receiver: mpsc::Receiver<StreamEvent>) {
        self.receivers.lock().await.insert(session_id, receiver);
    }

    pub async fn take(&self, session_id: Uuid) -> Option<mpsc::Receiver<StreamEvent>> {
        self.receivers.lock().await.remove(&session_id)
    }
}
