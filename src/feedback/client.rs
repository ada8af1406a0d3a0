use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::messages::{ErrorPayload, FeedbackRequest, FeedbackResult};

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("scoring service error (status {status}): {message}")]
    Status { status: u16, message: String },
}

/// Scores an answer against its question
#[async_trait]
pub trait FeedbackClient: Send + Sync {
    async fn evaluate(&self, request: &FeedbackRequest) -> Result<FeedbackResult, FeedbackError>;
}

/// [`FeedbackClient`] backed by the HTTP scoring endpoint
pub struct HttpFeedbackClient {
    client: Client,
    endpoint: String,
}

impl HttpFeedbackClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FeedbackError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl FeedbackClient for HttpFeedbackClient {
    async fn evaluate(&self, request: &FeedbackRequest) -> Result<FeedbackResult, FeedbackError> {
        debug!("POST {} ({} chars of answer)", self.endpoint, request.answer.len());

        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorPayload>(&body)
                .ok()
                .and_then(ErrorPayload::message)
                .unwrap_or(body);
            return Err(FeedbackError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<FeedbackResult>().await?)
    }
}
