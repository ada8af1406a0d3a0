use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub interview: InterviewConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Speech output (TTS) settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Target voice locale, e.g. "en-US"
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,

    /// Upper bound on waiting for the voice catalog before the first utterance
    pub voice_ready_timeout_ms: u64,

    /// How often the voice catalog is re-checked while waiting
    pub voice_poll_interval_ms: u64,
}

impl SpeechConfig {
    pub fn voice_ready_timeout(&self) -> Duration {
        Duration::from_millis(self.voice_ready_timeout_ms)
    }

    pub fn voice_poll_interval(&self) -> Duration {
        Duration::from_millis(self.voice_poll_interval_ms.max(1))
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            voice_ready_timeout_ms: 1500,
            voice_poll_interval_ms: 100,
        }
    }
}

/// Speech input (STT) settings, passed to the recognizer on every start
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub locale: String,

    /// Keep the session open across utterances until explicitly stopped
    pub continuous: bool,

    /// Emit provisional hypotheses before finalization
    pub interim_results: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            continuous: true,
            interim_results: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Scoring endpoint (HTTP POST, JSON)
    pub endpoint: String,
    pub timeout_secs: u64,

    /// Role the candidate is interviewing for
    pub role: Option<String>,

    /// Answer structure the scorer should evaluate against (e.g. "STAR")
    pub style: Option<String>,

    pub rubric_dimensions: Vec<String>,

    /// Resume text sent with every request
    pub resume_text: Option<String>,

    /// Job description text sent with every request
    pub jd_text: Option<String>,
}

impl FeedbackConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/api/v1/feedback/interview-answer".to_string(),
            timeout_secs: 20,
            role: None,
            style: Some("STAR".to_string()),
            rubric_dimensions: vec![
                "structure".to_string(),
                "impact".to_string(),
                "clarity".to_string(),
            ],
            resume_text: None,
            jd_text: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl ChatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/api/v1/interview-assistant".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InterviewConfig {
    /// Question set used when a start request does not carry its own
    pub questions: Vec<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        settings
            .try_deserialize()
            .context("Failed to deserialize config")
    }
}
