use crate::bridge::BridgeHub;
use crate::chat::TextChat;
use crate::interview::InterviewHandle;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The one interview orchestrator this service hosts
    pub interview: InterviewHandle,

    /// Connection to the page's speech engines
    pub bridge: BridgeHub,

    /// Text-chat fallback conversation
    pub chat: Arc<Mutex<TextChat>>,
}

impl AppState {
    pub fn new(interview: InterviewHandle, bridge: BridgeHub, chat: TextChat) -> Self {
        Self {
            interview,
            bridge,
            chat: Arc::new(Mutex::new(chat)),
        }
    }
}
