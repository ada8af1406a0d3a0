//! Speech output and input controllers
//!
//! Engines (the OS- or browser-owned TTS/STT capabilities) sit behind the
//! [`SpeechSynthesizer`] and [`SpeechRecognizer`] traits. The controllers add the
//! discipline the orchestrator relies on: one utterance at a time, stop-before-start
//! recognition, and dropping events that belong to cancelled work.

mod engine;
mod input;
mod output;
mod voice;

pub use engine::{
    EngineError, RecognitionAlternative, RecognitionEvent, RecognitionSessionId,
    SpeechRecognizer, SpeechSynthesizer, SynthesisEvent, Utterance, UtteranceId,
};
pub use input::{InputTransition, ListeningState, RecognitionUpdate, SpeechInputController};
pub use output::{OutputTransition, SpeakOutcome, SpeakingState, SpeechOutputController};
pub use voice::{select_voice, Voice};
