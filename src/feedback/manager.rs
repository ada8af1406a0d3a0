use crate::config::FeedbackConfig;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::client::FeedbackClient;
use super::messages::{FeedbackRequest, FeedbackResult};

/// Identifies one issued feedback request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackTicket {
    /// Session generation the request was issued in
    pub generation: u64,
    /// Issuance order, monotonically increasing across generations
    pub seq: u64,
}

/// Completion of a feedback request, delivered back to the orchestrator.
/// `result` is `None` when the request failed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackReply {
    pub ticket: FeedbackTicket,
    pub result: Option<FeedbackResult>,
}

/// Fire-and-forget scoring of finalized answers
///
/// Requests run concurrently in their own tasks and report back over a channel.
/// Only the reply to the most recently issued request that has answered so far is
/// displayed; replies from an older generation are dropped.
pub struct FeedbackManager {
    client: Arc<dyn FeedbackClient>,
    config: FeedbackConfig,
    replies: mpsc::UnboundedSender<FeedbackReply>,
    generation: u64,
    next_seq: u64,
    displayed: Option<(u64, FeedbackResult)>,
}

impl FeedbackManager {
    /// Create a manager and the receiver its replies arrive on
    pub fn new(
        client: Arc<dyn FeedbackClient>,
        config: FeedbackConfig,
    ) -> (Self, mpsc::UnboundedReceiver<FeedbackReply>) {
        let (replies, rx) = mpsc::unbounded_channel();

        let manager = Self {
            client,
            config,
            replies,
            generation: 0,
            next_seq: 1,
            displayed: None,
        };

        (manager, rx)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Begin a new generation and forget the displayed result (session start)
    pub fn reset(&mut self) -> u64 {
        self.displayed = None;
        self.invalidate()
    }

    /// Begin a new generation so in-flight replies are discarded (session stop)
    pub fn invalidate(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Score `answer` against `question` without waiting for the result
    pub fn request_feedback(&mut self, question: &str, answer: &str) -> FeedbackTicket {
        let ticket = FeedbackTicket {
            generation: self.generation,
            seq: self.next_seq,
        };
        self.next_seq += 1;

        let request = FeedbackRequest {
            question: question.to_string(),
            answer: answer.to_string(),
            role: self.config.role.clone(),
            rubric_dimensions: self.config.rubric_dimensions.clone(),
            style: self.config.style.clone(),
            resume_text: self.config.resume_text.clone(),
            jd_text: self.config.jd_text.clone(),
        };

        let client = Arc::clone(&self.client);
        let replies = self.replies.clone();

        tokio::spawn(async move {
            let result = match client.evaluate(&request).await {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Feedback request {} failed: {}", ticket.seq, e);
                    None
                }
            };

            // A closed channel means the orchestrator is gone; nothing to report to
            if replies.send(FeedbackReply { ticket, result }).is_err() {
                debug!("Dropping feedback reply {}, orchestrator closed", ticket.seq);
            }
        });

        debug!(
            "Issued feedback request {} (generation {})",
            ticket.seq, ticket.generation
        );

        ticket
    }

    /// Apply a reply if it is current; returns whether the displayed result changed
    pub fn apply(&mut self, reply: FeedbackReply) -> bool {
        let FeedbackReply { ticket, result } = reply;

        if ticket.generation != self.generation {
            debug!(
                "Discarding feedback {} from generation {} (current {})",
                ticket.seq, ticket.generation, self.generation
            );
            return false;
        }

        let Some(result) = result else {
            return false;
        };

        if let Some((shown, _)) = &self.displayed {
            if ticket.seq < *shown {
                debug!(
                    "Discarding feedback {}, newer request {} already shown",
                    ticket.seq, shown
                );
                return false;
            }
        }

        info!("Feedback {} applied (score {:?})", ticket.seq, result.score);
        self.displayed = Some((ticket.seq, result));
        true
    }

    pub fn latest(&self) -> Option<&FeedbackResult> {
        self.displayed.as_ref().map(|(_, result)| result)
    }

    pub fn latest_seq(&self) -> Option<u64> {
        self.displayed.as_ref().map(|(seq, _)| *seq)
    }
}
