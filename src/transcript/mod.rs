//! Interview transcript
//!
//! Ordered, append-only record of what the assistant asked and what the candidate
//! answered, plus one ephemeral slot for the not-yet-final recognition hypothesis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Assistant,
    User,
}

/// A single finalized line of the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub speaker: Speaker,

    pub text: String,

    /// When the line was appended
    pub timestamp: DateTime<Utc>,

    /// Question the answer belongs to (user lines only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_index: Option<usize>,
}

/// Serializable view of the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSnapshot {
    pub lines: Vec<TranscriptLine>,
    pub interim: String,
}

#[derive(Debug, Default)]
pub struct TranscriptStore {
    lines: Vec<TranscriptLine>,
    interim: String,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything; only used when a new session starts
    pub fn reset(&mut self) {
        self.lines.clear();
        self.interim.clear();
    }

    pub fn push_assistant(&mut self, text: &str) -> &TranscriptLine {
        self.push(TranscriptLine {
            speaker: Speaker::Assistant,
            text: text.to_string(),
            timestamp: Utc::now(),
            question_index: None,
        })
    }

    pub fn push_user(&mut self, text: &str, question_index: usize) -> &TranscriptLine {
        self.push(TranscriptLine {
            speaker: Speaker::User,
            text: text.to_string(),
            timestamp: Utc::now(),
            question_index: Some(question_index),
        })
    }

    /// Replace the interim hypothesis wholesale
    pub fn set_interim(&mut self, text: &str) {
        self.interim.clear();
        self.interim.push_str(text);
    }

    pub fn clear_interim(&mut self) {
        self.interim.clear();
    }

    pub fn interim(&self) -> &str {
        &self.interim
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn last(&self) -> Option<&TranscriptLine> {
        self.lines.last()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        TranscriptSnapshot {
            lines: self.lines.clone(),
            interim: self.interim.clone(),
        }
    }

    fn push(&mut self, line: TranscriptLine) -> &TranscriptLine {
        self.lines.push(line);
        &self.lines[self.lines.len() - 1]
    }
}
