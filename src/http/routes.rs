use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the HTTP router with all routes under /api/v1.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/record", post(handlers::record))
        .route("/transcribe", post(handlers::transcribe))
        .route("/translate", post(handlers::translate))
        .route("/process", post(handlers::process))
        .route("/stream-transcribe", post(handlers::stream_transcribe))
        .route("/play/:filename", get(handlers::play))
        .route("/download/:filename", get(handlers::download));

    Router::new()
        .route("/", get(handlers::root))
        .nest("/api/v1", api)
        // Declared-but-unenforced in the original; enforced here.
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        // The original served a browser frontend from another origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
