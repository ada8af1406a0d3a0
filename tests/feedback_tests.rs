// Feedback manager and scoring client tests

mod common;

use anyhow::Result;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use common::FakeFeedbackClient;
use mockmate::config::FeedbackConfig;
use mockmate::feedback::{
    FeedbackClient, FeedbackError, FeedbackManager, FeedbackReply, FeedbackRequest,
    FeedbackResult, HttpFeedbackClient,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

fn manager(scorer: &FakeFeedbackClient) -> (FeedbackManager, UnboundedReceiver<FeedbackReply>) {
    FeedbackManager::new(Arc::new(scorer.clone()), FeedbackConfig::default())
}

// ============================================================================
// Manager
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_late_reply_to_older_request_is_discarded() -> Result<()> {
    let scorer = FakeFeedbackClient::default();
    scorer.delay("first answer", Duration::from_millis(500));
    let (mut feedback, mut rx) = manager(&scorer);

    let first = feedback.request_feedback("Q1", "first answer");
    let second = feedback.request_feedback("Q1", "second answer");
    assert!(second.seq > first.seq);

    let reply = rx.recv().await.unwrap();
    assert_eq!(reply.ticket, second);
    assert!(feedback.apply(reply));

    let reply = rx.recv().await.unwrap();
    assert_eq!(reply.ticket, first);
    assert!(!feedback.apply(reply));

    assert_eq!(feedback.latest_seq(), Some(second.seq));
    assert_eq!(feedback.latest().unwrap().strengths, vec!["second answer".to_string()]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_older_reply_shown_until_newer_arrives() -> Result<()> {
    let scorer = FakeFeedbackClient::default();
    scorer.delay("second answer", Duration::from_millis(500));
    let (mut feedback, mut rx) = manager(&scorer);

    feedback.request_feedback("Q1", "first answer");
    let second = feedback.request_feedback("Q2", "second answer");

    assert!(feedback.apply(rx.recv().await.unwrap()));
    assert_eq!(feedback.latest().unwrap().strengths, vec!["first answer".to_string()]);

    assert!(feedback.apply(rx.recv().await.unwrap()));
    assert_eq!(feedback.latest_seq(), Some(second.seq));

    Ok(())
}

#[tokio::test]
async fn test_invalidate_drops_in_flight_but_keeps_display() -> Result<()> {
    let scorer = FakeFeedbackClient::default();
    let (mut feedback, mut rx) = manager(&scorer);

    feedback.request_feedback("Q1", "shown");
    assert!(feedback.apply(rx.recv().await.unwrap()));

    feedback.request_feedback("Q1", "in flight");
    feedback.invalidate();

    assert!(!feedback.apply(rx.recv().await.unwrap()));
    assert_eq!(feedback.latest().unwrap().strengths, vec!["shown".to_string()]);

    feedback.reset();
    assert!(feedback.latest().is_none());

    Ok(())
}

#[tokio::test]
async fn test_failed_request_changes_nothing() -> Result<()> {
    let scorer = FakeFeedbackClient::default();
    scorer.fail_all();
    let (mut feedback, mut rx) = manager(&scorer);

    let ticket = feedback.request_feedback("Q1", "answer");
    let reply = rx.recv().await.unwrap();

    assert_eq!(reply.ticket, ticket);
    assert!(reply.result.is_none());
    assert!(!feedback.apply(reply));
    assert!(feedback.latest().is_none());

    Ok(())
}

#[tokio::test]
async fn test_request_carries_configured_rubric() -> Result<()> {
    let scorer = FakeFeedbackClient::default();
    let config = FeedbackConfig {
        role: Some("Backend Engineer".to_string()),
        resume_text: Some("Five years building payment APIs in Rust".to_string()),
        jd_text: Some("Senior backend engineer, distributed systems".to_string()),
        ..Default::default()
    };
    let (mut feedback, mut rx) = FeedbackManager::new(Arc::new(scorer.clone()), config);

    feedback.request_feedback("Why Rust?", "Memory safety without GC");
    rx.recv().await.unwrap();

    let requests = scorer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].question, "Why Rust?");
    assert_eq!(requests[0].answer, "Memory safety without GC");
    assert_eq!(requests[0].role.as_deref(), Some("Backend Engineer"));
    assert_eq!(requests[0].style.as_deref(), Some("STAR"));
    assert_eq!(requests[0].rubric_dimensions, vec!["structure", "impact", "clarity"]);
    assert_eq!(
        requests[0].resume_text.as_deref(),
        Some("Five years building payment APIs in Rust")
    );
    assert_eq!(
        requests[0].jd_text.as_deref(),
        Some("Senior backend engineer, distributed systems")
    );

    Ok(())
}

// ============================================================================
// Wire format
// ============================================================================

#[test]
fn test_request_serializes_camel_case() -> Result<()> {
    let request = FeedbackRequest {
        question: "Q".to_string(),
        answer: "A".to_string(),
        role: None,
        rubric_dimensions: vec!["clarity".to_string()],
        style: Some("STAR".to_string()),
        resume_text: None,
        jd_text: None,
    };

    let value = serde_json::to_value(&request)?;

    assert_eq!(
        value,
        json!({
            "question": "Q",
            "answer": "A",
            "rubricDimensions": ["clarity"],
            "style": "STAR"
        })
    );

    Ok(())
}

#[test]
fn test_request_sends_context_under_backend_names() -> Result<()> {
    let request = FeedbackRequest {
        question: "Q".to_string(),
        answer: "A".to_string(),
        role: Some("SRE".to_string()),
        rubric_dimensions: Vec::new(),
        style: None,
        resume_text: Some("On-call lead for three years".to_string()),
        jd_text: Some("Own reliability of the payments platform".to_string()),
    };

    let value = serde_json::to_value(&request)?;

    assert_eq!(value["resume_text"], "On-call lead for three years");
    assert_eq!(value["jd_text"], "Own reliability of the payments platform");
    assert!(value.get("resumeText").is_none());

    Ok(())
}

#[test]
fn test_result_accepts_backend_field_names() -> Result<()> {
    let result: FeedbackResult = serde_json::from_value(json!({
        "score": 8,
        "strengths": ["Clear situation"],
        "improvements": ["Name the metric you moved"],
        "improved_answer": "In 2023 I led..."
    }))?;

    assert_eq!(result.score, Some(8.0));
    assert_eq!(result.gaps, vec!["Name the metric you moved".to_string()]);
    assert_eq!(result.improved_answer.as_deref(), Some("In 2023 I led..."));

    let minimal: FeedbackResult = serde_json::from_value(json!({}))?;
    assert_eq!(minimal, FeedbackResult::default());

    Ok(())
}

// ============================================================================
// HTTP client
// ============================================================================

async fn score(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "score": 6.5,
        "strengths": [body["answer"]],
        "gaps": body["rubricDimensions"],
    }))
}

async fn overloaded() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "Failed to generate feedback" })),
    )
}

async fn bad_gateway() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "upstream down")
}

async fn scoring_server() -> Result<String> {
    let app = Router::new()
        .route("/score", post(score))
        .route("/overloaded", post(overloaded))
        .route("/gateway", post(bad_gateway));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://{}", addr))
}

fn sample_request() -> FeedbackRequest {
    FeedbackRequest {
        question: "Describe a conflict.".to_string(),
        answer: "We disagreed on the schema".to_string(),
        role: None,
        rubric_dimensions: vec!["structure".to_string(), "impact".to_string()],
        style: None,
        resume_text: None,
        jd_text: None,
    }
}

#[tokio::test]
async fn test_http_client_scores_answer() -> Result<()> {
    let base = scoring_server().await?;
    let client = HttpFeedbackClient::new(format!("{}/score", base), Duration::from_secs(5))?;

    let result = client.evaluate(&sample_request()).await?;

    assert_eq!(result.score, Some(6.5));
    assert_eq!(result.strengths, vec!["We disagreed on the schema".to_string()]);
    assert_eq!(result.gaps, vec!["structure".to_string(), "impact".to_string()]);

    Ok(())
}

#[tokio::test]
async fn test_http_client_reports_error_detail() -> Result<()> {
    let base = scoring_server().await?;
    let client = HttpFeedbackClient::new(format!("{}/overloaded", base), Duration::from_secs(5))?;

    let err = client.evaluate(&sample_request()).await.unwrap_err();

    match err {
        FeedbackError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to generate feedback");
        }
        other => panic!("expected status error, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_http_client_falls_back_to_raw_body() -> Result<()> {
    let base = scoring_server().await?;
    let client = HttpFeedbackClient::new(format!("{}/gateway", base), Duration::from_secs(5))?;

    let err = client.evaluate(&sample_request()).await.unwrap_err();

    match err {
        FeedbackError::Status { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "upstream down");
        }
        other => panic!("expected status error, got {:?}", other),
    }

    Ok(())
}
