use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feedback::FeedbackResult;
use crate::speech::{ListeningState, SpeakingState};
use crate::transcript::TranscriptSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Running,
}

/// Lifecycle state owned by the orchestrator
#[derive(Debug, Clone)]
pub struct Session {
    pub status: SessionStatus,
    pub id: Option<Uuid>,
    pub question_index: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            status: SessionStatus::Idle,
            id: None,
            question_index: 0,
        }
    }
}

/// Point-in-time view of the session, including the audio sub-states
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub session_id: Option<Uuid>,
    pub question_index: usize,
    pub question_count: usize,
    pub current_question: Option<String>,
    pub speaking: SpeakingState,
    pub listening: ListeningState,
    pub generation: u64,
}

/// Everything a client needs to render the interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewView {
    pub session: SessionSnapshot,
    pub transcript: TranscriptSnapshot,
    pub feedback: Option<FeedbackResult>,
}
