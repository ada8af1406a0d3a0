use crate::config::RecognitionConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::voice::Voice;

/// Identifies one utterance handed to a synthesizer
pub type UtteranceId = u64;

/// Identifies one start/stop cycle of a recognizer
pub type RecognitionSessionId = u64;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("speech engine is not available")]
    Unavailable,

    #[error("speech engine rejected the request: {0}")]
    Rejected(String),
}

/// A single utterance with its playback parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    /// Name of the selected voice, if the catalog had one
    pub voice: Option<String>,
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Callbacks from a speech synthesizer, tagged with the utterance they belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SynthesisEvent {
    Started { utterance: UtteranceId },
    Ended { utterance: UtteranceId },
    Error { utterance: UtteranceId, message: String },
}

/// One recognition hypothesis inside a result event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionAlternative {
    pub is_final: bool,
    pub transcript: String,
}

/// Callbacks from a speech recognizer, tagged with the session they belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecognitionEvent {
    Started {
        session: RecognitionSessionId,
    },
    Result {
        session: RecognitionSessionId,
        results: Vec<RecognitionAlternative>,
    },
    Error {
        session: RecognitionSessionId,
        message: String,
    },
    Ended {
        session: RecognitionSessionId,
    },
}

impl RecognitionEvent {
    pub fn session(&self) -> RecognitionSessionId {
        match self {
            Self::Started { session }
            | Self::Result { session, .. }
            | Self::Error { session, .. }
            | Self::Ended { session } => *session,
        }
    }
}

/// Speech output capability
///
/// Calls only issue work; progress is reported back as [`SynthesisEvent`]s by
/// whoever owns the engine.
pub trait SpeechSynthesizer: Send + Sync {
    /// Feature detection
    fn is_available(&self) -> bool;

    /// Current voice catalog (may be empty until the engine has loaded it)
    fn voices(&self) -> Vec<Voice>;

    /// Begin playing an utterance
    fn speak(&mut self, utterance: Utterance) -> Result<(), EngineError>;

    /// Cancel whatever is playing or queued
    fn cancel(&mut self);

    /// Engine name for logging
    fn name(&self) -> &str;
}

/// Speech input capability
///
/// Results are reported back as [`RecognitionEvent`]s by whoever owns the engine.
pub trait SpeechRecognizer: Send + Sync {
    /// Feature detection
    fn is_available(&self) -> bool;

    /// Open a recognition session
    fn start(
        &mut self,
        session: RecognitionSessionId,
        config: &RecognitionConfig,
    ) -> Result<(), EngineError>;

    /// Close a recognition session
    fn stop(&mut self, session: RecognitionSessionId);

    /// Engine name for logging
    fn name(&self) -> &str;
}
