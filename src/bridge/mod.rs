//! Speech engines that live in a remote page
//!
//! The browser owns the speaker and the microphone. It subscribes to the
//! [`EngineCommand`] stream, executes each command with its own TTS/STT APIs, and
//! posts engine events back. Feature detection results and the voice catalog are
//! reported the same way, and may arrive some time after the page loads.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::RecognitionConfig;
use crate::speech::{
    EngineError, RecognitionSessionId, SpeechRecognizer, SpeechSynthesizer, Utterance, Voice,
};

const COMMAND_BUFFER: usize = 64;

/// Work for the page's speech engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineCommand {
    Speak {
        utterance: Utterance,
    },
    CancelSpeech,
    StartRecognition {
        session: RecognitionSessionId,
        config: RecognitionConfig,
    },
    StopRecognition {
        session: RecognitionSessionId,
    },
}

/// Feature detection results reported by the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub speech_output: bool,
    pub speech_input: bool,
}

#[derive(Debug, Default)]
struct BridgeState {
    capabilities: Capabilities,
    voices: Vec<Voice>,
}

/// Shared connection point between the engines and the page
#[derive(Clone)]
pub struct BridgeHub {
    commands: broadcast::Sender<EngineCommand>,
    state: Arc<RwLock<BridgeState>>,
}

impl BridgeHub {
    pub fn new() -> Self {
        let (commands, _) = broadcast::channel(COMMAND_BUFFER);

        Self {
            commands,
            state: Arc::new(RwLock::new(BridgeState::default())),
        }
    }

    /// Receive engine commands (one receiver per connected page)
    pub fn subscribe(&self) -> broadcast::Receiver<EngineCommand> {
        self.commands.subscribe()
    }

    pub fn report_capabilities(&self, capabilities: Capabilities) {
        info!(
            "Page capabilities: speech_output={}, speech_input={}",
            capabilities.speech_output, capabilities.speech_input
        );
        self.write().capabilities = capabilities;
    }

    pub fn report_voices(&self, voices: Vec<Voice>) {
        info!("Page reported {} voices", voices.len());
        self.write().voices = voices;
    }

    pub fn capabilities(&self) -> Capabilities {
        self.read().capabilities
    }

    pub fn synthesizer(&self) -> BridgeSynthesizer {
        BridgeSynthesizer { hub: self.clone() }
    }

    pub fn recognizer(&self) -> BridgeRecognizer {
        BridgeRecognizer { hub: self.clone() }
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.commands
            .send(command)
            .map(|receivers| debug!("Engine command sent to {} page(s)", receivers))
            .map_err(|_| EngineError::Unavailable)
    }

    fn read(&self) -> RwLockReadGuard<'_, BridgeState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BridgeState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for BridgeHub {
    fn default() -> Self {
        Self::new()
    }
}

/// [`SpeechSynthesizer`] executed by the page
pub struct BridgeSynthesizer {
    hub: BridgeHub,
}

impl SpeechSynthesizer for BridgeSynthesizer {
    fn is_available(&self) -> bool {
        self.hub.read().capabilities.speech_output
    }

    fn voices(&self) -> Vec<Voice> {
        self.hub.read().voices.clone()
    }

    fn speak(&mut self, utterance: Utterance) -> Result<(), EngineError> {
        self.hub.send(EngineCommand::Speak { utterance })
    }

    fn cancel(&mut self) {
        // No page connected means nothing is playing
        let _ = self.hub.send(EngineCommand::CancelSpeech);
    }

    fn name(&self) -> &str {
        "bridge-tts"
    }
}

/// [`SpeechRecognizer`] executed by the page
pub struct BridgeRecognizer {
    hub: BridgeHub,
}

impl SpeechRecognizer for BridgeRecognizer {
    fn is_available(&self) -> bool {
        self.hub.read().capabilities.speech_input
    }

    fn start(
        &mut self,
        session: RecognitionSessionId,
        config: &RecognitionConfig,
    ) -> Result<(), EngineError> {
        self.hub.send(EngineCommand::StartRecognition {
            session,
            config: config.clone(),
        })
    }

    fn stop(&mut self, session: RecognitionSessionId) {
        let _ = self.hub.send(EngineCommand::StopRecognition { session });
    }

    fn name(&self) -> &str {
        "bridge-stt"
    }
}
