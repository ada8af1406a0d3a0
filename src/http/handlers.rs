use super::state::AppState;
use crate::bridge::Capabilities;
use crate::chat::{ChatReply, ChatRequest};
use crate::interview::InterviewError;
use crate::speech::{RecognitionEvent, SynthesisEvent, Voice};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct StartInterviewRequest {
    /// Replaces the configured question set for this session
    pub questions: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    /// Where the client should go instead, when voice is not possible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fallback: None,
        }
    }
}

fn interview_error(e: InterviewError) -> Response {
    match e {
        InterviewError::CapabilityUnavailable(_) => {
            warn!("Interview rejected: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: e.to_string(),
                    fallback: Some("/chat".to_string()),
                }),
            )
                .into_response()
        }
        InterviewError::NoQuestions => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
        InterviewError::Closed => {
            error!("Interview runtime is gone");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Interview control
// ============================================================================

/// POST /interview/start
pub async fn start_interview(
    State(state): State<AppState>,
    req: Option<Json<StartInterviewRequest>>,
) -> impl IntoResponse {
    let req = req.map(|Json(req)| req).unwrap_or_default();

    match state.interview.start(req.questions).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => interview_error(e),
    }
}

/// POST /interview/next
pub async fn next_question(State(state): State<AppState>) -> impl IntoResponse {
    match state.interview.next().await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => interview_error(e),
    }
}

/// POST /interview/stop
pub async fn stop_interview(State(state): State<AppState>) -> impl IntoResponse {
    match state.interview.stop().await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => interview_error(e),
    }
}

// ============================================================================
// Interview queries
// ============================================================================

/// GET /interview/status
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    match state.interview.view().await {
        Ok(view) => (StatusCode::OK, Json(view.session)).into_response(),
        Err(e) => interview_error(e),
    }
}

/// GET /interview/transcript
pub async fn get_transcript(State(state): State<AppState>) -> impl IntoResponse {
    match state.interview.view().await {
        Ok(view) => (StatusCode::OK, Json(view.transcript)).into_response(),
        Err(e) => interview_error(e),
    }
}

/// GET /interview/feedback
/// Latest applied feedback, `null` until one arrives
pub async fn get_feedback(State(state): State<AppState>) -> impl IntoResponse {
    match state.interview.view().await {
        Ok(view) => (StatusCode::OK, Json(view.feedback)).into_response(),
        Err(e) => interview_error(e),
    }
}

// ============================================================================
// Page-side speech engines
// ============================================================================

/// GET /engine/commands
/// Server-sent events the page executes with its TTS/STT engines
pub async fn engine_commands(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>> + Send + 'static> {
    let mut rx = state.bridge.subscribe();
    info!("Page subscribed to engine commands");

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(command) => match SseEvent::default().json_data(&command) {
                    Ok(event) => yield Ok(event),
                    Err(e) => warn!("Failed to encode engine command: {}", e),
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Page fell behind, {} engine commands dropped", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    )
}

/// POST /engine/capabilities
pub async fn report_capabilities(
    State(state): State<AppState>,
    Json(capabilities): Json<Capabilities>,
) -> impl IntoResponse {
    state.bridge.report_capabilities(capabilities);
    StatusCode::NO_CONTENT
}

/// POST /engine/voices
pub async fn report_voices(
    State(state): State<AppState>,
    Json(voices): Json<Vec<Voice>>,
) -> impl IntoResponse {
    state.bridge.report_voices(voices);
    StatusCode::NO_CONTENT
}

/// POST /engine/synthesis
pub async fn synthesis_event(
    State(state): State<AppState>,
    Json(event): Json<SynthesisEvent>,
) -> impl IntoResponse {
    match state.interview.deliver_synthesis(event).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e) => interview_error(e),
    }
}

/// POST /engine/recognition
pub async fn recognition_event(
    State(state): State<AppState>,
    Json(event): Json<RecognitionEvent>,
) -> impl IntoResponse {
    match state.interview.deliver_recognition(event).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e) => interview_error(e),
    }
}

// ============================================================================
// Text-chat fallback
// ============================================================================

/// POST /chat
pub async fn send_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    if req.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Message is empty")),
        )
            .into_response();
    }

    let mut chat = state.chat.lock().await;
    match chat.exchange(&req.message).await {
        Ok(reply) => (
            StatusCode::OK,
            Json(ChatReply {
                reply: reply.text.clone(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Chat failed: {:#}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new(format!("Chat failed: {}", e))),
            )
                .into_response()
        }
    }
}

/// GET /chat
pub async fn get_chat_log(State(state): State<AppState>) -> impl IntoResponse {
    let chat = state.chat.lock().await;
    (StatusCode::OK, Json(chat.log().to_vec()))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
