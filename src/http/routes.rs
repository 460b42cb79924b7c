use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/sessions/start", post(handlers::start_session))
        .route("/sessions/stop", post(handlers::stop_session))
        .route("/sessions/pause", post(handlers::pause_session))
        .route("/sessions/resume", post(handlers::resume_session))
        .route("/sessions/status", get(handlers::get_status))
        // Audio routing
        .route("/sessions/audio/mode", post(handlers::set_audio_mode))
        .route(
            "/sessions/audio/mic-muted",
            post(handlers::set_microphone_muted),
        )
        .route(
            "/sessions/audio/device-muted",
            post(handlers::set_device_audio_muted),
        )
        // Host apps call this from embedded webviews
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
