use crate::config::RecognitionConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::engine::{
    EngineError, RecognitionAlternative, RecognitionEvent, RecognitionSessionId, SpeechRecognizer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListeningState {
    Off,
    Listening,
}

/// Recognized text carried by one result event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognitionUpdate {
    /// Full not-yet-final hypothesis; replaces the previous one
    pub interim: String,

    /// Finalized chunks, in engine order
    pub finals: Vec<String>,
}

impl RecognitionUpdate {
    pub fn from_results(results: &[RecognitionAlternative]) -> Self {
        let mut update = Self::default();

        for alt in results {
            if alt.is_final {
                let text = alt.transcript.trim();
                if !text.is_empty() {
                    update.finals.push(text.to_string());
                }
            } else {
                update.interim.push_str(&alt.transcript);
            }
        }

        update.interim = update.interim.trim().to_string();
        update
    }
}

/// What a recognition event meant for the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputTransition {
    Confirmed,
    Update(RecognitionUpdate),
    /// Session closed on its own (silence timeout, device released, ...)
    Ended,
    Failed(String),
    /// Event belonged to a session we already stopped
    Ignored,
}

/// Continuous speech recognition on top of a [`SpeechRecognizer`]
///
/// The controller never restarts itself; the orchestrator decides when to listen.
pub struct SpeechInputController<R> {
    engine: R,
    config: RecognitionConfig,
    state: ListeningState,
    session: Option<RecognitionSessionId>,
    next_session: RecognitionSessionId,
}

impl<R: SpeechRecognizer> SpeechInputController<R> {
    pub fn new(engine: R, config: RecognitionConfig) -> Self {
        Self {
            engine,
            config,
            state: ListeningState::Off,
            session: None,
            next_session: 1,
        }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_available()
    }

    pub fn state(&self) -> ListeningState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == ListeningState::Listening
    }

    pub fn session(&self) -> Option<RecognitionSessionId> {
        self.session
    }

    /// Open a fresh recognition session, tearing down any existing one first
    pub fn start_listening(&mut self) -> Result<RecognitionSessionId, EngineError> {
        self.stop_listening();

        let session = self.next_session;
        self.next_session += 1;

        self.engine.start(session, &self.config).map_err(|e| {
            warn!("{} refused to start session {}: {}", self.engine.name(), session, e);
            e
        })?;

        self.session = Some(session);
        self.state = ListeningState::Listening;
        info!("Listening (session {}, locale {})", session, self.config.locale);

        Ok(session)
    }

    pub fn stop_listening(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("Stopping recognition session {}", session);
            self.engine.stop(session);
        }
        self.state = ListeningState::Off;
    }

    /// Apply an engine event to the listening state
    pub fn handle_event(&mut self, event: &RecognitionEvent) -> InputTransition {
        if self.session != Some(event.session()) {
            debug!("Ignoring event for stale recognition session {}", event.session());
            return InputTransition::Ignored;
        }

        match event {
            RecognitionEvent::Started { .. } => InputTransition::Confirmed,
            RecognitionEvent::Result { results, .. } => {
                InputTransition::Update(RecognitionUpdate::from_results(results))
            }
            RecognitionEvent::Ended { session } => {
                info!("Recognition session {} ended", session);
                self.session = None;
                self.state = ListeningState::Off;
                InputTransition::Ended
            }
            RecognitionEvent::Error { session, message } => {
                warn!("Recognition session {} failed: {}", session, message);
                self.session = None;
                self.state = ListeningState::Off;
                InputTransition::Failed(message.clone())
            }
        }
    }
}
