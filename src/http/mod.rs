//! HTTP API server for the interview page
//!
//! This module provides a REST API for driving the interview:
//! - POST /interview/start, /interview/next, /interview/stop - Session commands
//! - GET /interview/status, /interview/transcript, /interview/feedback - Queries
//! - GET /engine/commands - SSE stream of speech engine work for the page
//! - POST /engine/{capabilities,voices,synthesis,recognition} - Page reports
//! - POST/GET /chat - Text-chat fallback
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, StartInterviewRequest};
pub use routes::create_router;
pub use state::AppState;
