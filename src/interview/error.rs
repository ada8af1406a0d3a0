use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Audio capability a session needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    SpeechOutput,
    SpeechInput,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpeechOutput => write!(f, "speech output"),
            Self::SpeechInput => write!(f, "speech input"),
        }
    }
}

#[derive(Debug, Error)]
pub enum InterviewError {
    /// Feature detection failed; the caller should fall back to text chat
    #[error("{0} is not available on this device")]
    CapabilityUnavailable(Capability),

    #[error("interview has no questions")]
    NoQuestions,

    #[error("interview runtime is not running")]
    Closed,
}
