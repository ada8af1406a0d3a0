//! Best-effort answer scoring
//!
//! - `client`: the scoring endpoint contract and its HTTP implementation
//! - `manager`: concurrent dispatch with last-write-wins by issuance order

pub mod client;
pub mod manager;
pub mod messages;

pub use client::{FeedbackClient, FeedbackError, HttpFeedbackClient};
pub use manager::{FeedbackManager, FeedbackReply, FeedbackTicket};
pub use messages::{FeedbackRequest, FeedbackResult};
