//! Text-chat fallback
//!
//! Used when the page reports no speech capabilities: a plain request/reply
//! exchange with the interview assistant, logged in order.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::transcript::Speaker;

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// One entry of the chat log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send(&self, message: &str) -> Result<String>;
}

/// [`ChatClient`] backed by the assistant endpoint
pub struct HttpChatClient {
    client: Client,
    endpoint: String,
}

impl HttpChatClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build chat HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn send(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await
            .context("Failed to reach chat endpoint")?
            .error_for_status()
            .context("Chat endpoint returned an error")?;

        let reply: ChatReply = response
            .json()
            .await
            .context("Failed to parse chat reply")?;

        Ok(reply.reply)
    }
}

/// Linear log of a text-chat conversation
pub struct TextChat {
    client: Arc<dyn ChatClient>,
    log: Vec<ChatMessage>,
}

impl TextChat {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            client,
            log: Vec::new(),
        }
    }

    /// Send `message`, wait for the reply, and log both.
    ///
    /// If the request fails the user message stays logged and the error is returned.
    pub async fn exchange(&mut self, message: &str) -> Result<&ChatMessage> {
        let message = message.trim();
        if message.is_empty() {
            bail!("Chat message is empty");
        }

        self.push(Speaker::User, message);

        let reply = match self.client.send(message).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Chat exchange failed: {:#}", e);
                return Err(e);
            }
        };

        info!("Chat reply received ({} chars)", reply.len());
        Ok(self.push(Speaker::Assistant, &reply))
    }

    pub fn log(&self) -> &[ChatMessage] {
        &self.log
    }

    fn push(&mut self, speaker: Speaker, text: &str) -> &ChatMessage {
        self.log.push(ChatMessage {
            speaker,
            text: text.to_string(),
            timestamp: Utc::now(),
        });
        &self.log[self.log.len() - 1]
    }
}
