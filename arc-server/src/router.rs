use crate::handlers::{analyze, arc3, explanations, feedback, grover, health, performance, save_explained};
use crate::state::AppState;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

/// Builds the full route table, mirroring `mira-chat`'s
/// `create_router`: one `Router::new()` chain, a permissive CORS layer (the
/// frontend this serves is a separate deployable), state attached last.
pub fn build(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/puzzle/analyze/{puzzleId}/{modelKey}", post(analyze::analyze))
        .route("/api/puzzle/save-explained/{puzzleId}", post(save_explained::save_explained))
        .route("/api/puzzle/{puzzleId}/explanations", get(explanations::list_for_puzzle))
        .route("/api/puzzle/grover/{puzzleId}/{modelKey}", post(grover::start_grover))
        .route("/api/puzzle/grover/stream/{sessionId}", get(grover::grover_stream))
        .route("/api/arc3/stream/prepare", post(arc3::prepare))
        .route("/api/arc3/stream/{sessionId}", get(arc3::stream_subscribe))
        .route("/api/arc3/stream/cancel/{sessionId}", post(arc3::cancel))
        .route("/api/model-dataset/performance/{modelName}/{datasetName}", get(performance::model_dataset_performance))
        .route("/api/discussion/eligible", get(explanations::discussion_eligible))
        .route("/api/explanation/{explanationId}/feedback", post(feedback::record_feedback))
        .layer(cors)
        .with_state(state)
}
