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
        // Interview control
        .route("/interview/start", post(handlers::start_interview))
        .route("/interview/next", post(handlers::next_question))
        .route("/interview/stop", post(handlers::stop_interview))
        // Interview queries
        .route("/interview/status", get(handlers::get_status))
        .route("/interview/transcript", get(handlers::get_transcript))
        .route("/interview/feedback", get(handlers::get_feedback))
        // Page-side speech engines
        .route("/engine/commands", get(handlers::engine_commands))
        .route("/engine/capabilities", post(handlers::report_capabilities))
        .route("/engine/voices", post(handlers::report_voices))
        .route("/engine/synthesis", post(handlers::synthesis_event))
        .route("/engine/recognition", post(handlers::recognition_event))
        // Text-chat fallback
        .route("/chat", get(handlers::get_chat_log).post(handlers::send_chat))
        // The page is served from another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
