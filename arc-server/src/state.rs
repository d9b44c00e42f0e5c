use crate::config::Config;
use crate::pending_streams::PendingStreams;
use crate::service_factory::ServiceFactory;
use arc_core::stream::SessionRegistry;
use arc_storage::{Arc3SessionStore, FeedbackStore, FsPuzzleRepository, IngestionRunStore, PgExplanationRepository};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared process state handed to every handler, the same role
/// `mira-chat`'s `AppState` plays — a `Clone`-able bundle of `Arc<T>`s so
/// `axum`'s `with_state` can fan it out per-request without locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: PgPool,
    pub explanations: Arc<PgExplanationRepository>,
    pub puzzles: Arc<FsPuzzleRepository>,
    pub arc3_sessions: Arc<Arc3SessionStore>,
    pub feedback: Arc<FeedbackStore>,
    pub ingestion: Arc<IngestionRunStore>,
    pub streams: Arc<SessionRegistry>,
    pub pending_streams: Arc<PendingStreams>,
    pub factory: Arc<ServiceFactory>,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        let factory = ServiceFactory::new(&config);
        let dataset_root = config.puzzle_dataset_root.clone();
        Self {
            config: Arc::new(config),
            explanations: Arc::new(PgExplanationRepository::new(pool.clone())),
            puzzles: Arc::new(FsPuzzleRepository::new(pool.clone(), dataset_root)),
            arc3_sessions: Arc::new(Arc3SessionStore::new(pool.clone())),
            feedback: Arc::new(FeedbackStore::new(pool.clone())),
            ingestion: Arc::new(IngestionRunStore::new(pool.clone())),
            streams: Arc::new(SessionRegistry::new()),
            pending_streams: Arc::new(PendingStreams::new()),
            factory: Arc::new(factory),
            pool,
        }
    }
}
