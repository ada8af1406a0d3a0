pub mod bridge;
pub mod chat;
pub mod config;
pub mod feedback;
pub mod http;
pub mod interview;
pub mod speech;
pub mod transcript;

pub use bridge::{BridgeHub, Capabilities, EngineCommand};
pub use chat::{ChatClient, HttpChatClient, TextChat};
pub use config::Config;
pub use feedback::{FeedbackClient, FeedbackManager, FeedbackResult, HttpFeedbackClient};
pub use http::{create_router, AppState};
pub use interview::{Command, InterviewError, InterviewHandle, Orchestrator, SessionStatus};
pub use speech::{
    RecognitionEvent, SpeechInputController, SpeechOutputController, SpeechRecognizer,
    SpeechSynthesizer, SynthesisEvent,
};
pub use transcript::{Speaker, TranscriptLine, TranscriptStore};
