use crate::config::SpeechConfig;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::engine::{EngineError, SpeechSynthesizer, SynthesisEvent, Utterance, UtteranceId};
use super::voice::{select_voice, Voice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakingState {
    Idle,
    Speaking,
}

/// Result of asking the controller to speak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// A new utterance was issued to the engine
    Started(UtteranceId),
    /// The same text is already playing; nothing was issued
    AlreadySpeaking(UtteranceId),
}

/// What a synthesis event meant for the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTransition {
    /// Engine confirmed playback of the current utterance
    Confirmed,
    /// Current utterance finished playing
    Finished,
    /// Current utterance failed
    Failed(String),
    /// Event belonged to a cancelled or unknown utterance
    Ignored,
}

/// Speaks one utterance at a time on top of a [`SpeechSynthesizer`]
pub struct SpeechOutputController<S> {
    engine: S,
    config: SpeechConfig,
    state: SpeakingState,

    /// Utterance whose events we are waiting for
    current: Option<UtteranceId>,
    current_text: Option<String>,
    next_id: UtteranceId,

    /// Selected voice, resolved once per session
    voice: Option<Voice>,
    prepared: bool,
}

impl<S: SpeechSynthesizer> SpeechOutputController<S> {
    pub fn new(engine: S, config: SpeechConfig) -> Self {
        Self {
            engine,
            config,
            state: SpeakingState::Idle,
            current: None,
            current_text: None,
            next_id: 1,
            voice: None,
            prepared: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_available()
    }

    pub fn state(&self) -> SpeakingState {
        self.state
    }

    pub fn is_speaking(&self) -> bool {
        self.state == SpeakingState::Speaking
    }

    pub fn voice(&self) -> Option<&Voice> {
        self.voice.as_ref()
    }

    /// Forget per-session state so the next utterance re-resolves the voice
    pub fn reset_session(&mut self) {
        self.cancel();
        self.prepared = false;
        self.voice = None;
    }

    /// Wait until the engine's voice catalog is populated, then pick a voice.
    ///
    /// Catalogs are often empty right after the engine comes up. The wait is
    /// bounded by `voice_ready_timeout`; past it we carry on without a voice.
    pub async fn prepare(&mut self) -> Option<&Voice> {
        if self.prepared {
            return self.voice.as_ref();
        }
        self.prepared = true;

        let poll = self.config.voice_poll_interval();
        let engine = &self.engine;
        let catalog = timeout(self.config.voice_ready_timeout(), async {
            loop {
                let voices = engine.voices();
                if !voices.is_empty() {
                    return voices;
                }
                sleep(poll).await;
            }
        })
        .await;

        match catalog {
            Ok(voices) => {
                self.voice = select_voice(&voices, &self.config.locale).cloned();
                info!(
                    "Voice catalog ready ({} voices), using {:?}",
                    voices.len(),
                    self.voice.as_ref().map(|v| v.name.as_str())
                );
            }
            Err(_) => {
                warn!(
                    "Voice catalog still empty after {}ms, speaking with engine default",
                    self.config.voice_ready_timeout_ms
                );
                self.voice = None;
            }
        }

        self.voice.as_ref()
    }

    /// Start speaking `text`, cancelling any utterance still in flight.
    ///
    /// `speaking` flips to true before this returns. Completion arrives later as a
    /// [`SynthesisEvent`] passed to [`Self::handle_event`].
    pub fn speak(&mut self, text: &str) -> Result<SpeakOutcome, EngineError> {
        if let (Some(id), Some(current)) = (self.current, self.current_text.as_deref()) {
            if self.is_speaking() && current == text {
                debug!("Utterance {} already speaking the same text, skipping", id);
                return Ok(SpeakOutcome::AlreadySpeaking(id));
            }
        }

        if self.current.is_some() {
            self.cancel();
        }

        let id = self.next_id;
        self.next_id += 1;

        let utterance = Utterance {
            id,
            text: text.to_string(),
            voice: self.voice.as_ref().map(|v| v.name.clone()),
            locale: self.config.locale.clone(),
            rate: self.config.rate,
            pitch: self.config.pitch,
            volume: self.config.volume,
        };

        self.current = Some(id);
        self.current_text = Some(utterance.text.clone());
        self.state = SpeakingState::Speaking;

        if let Err(e) = self.engine.speak(utterance) {
            warn!("{} rejected utterance {}: {}", self.engine.name(), id, e);
            self.clear();
            return Err(e);
        }

        debug!("Speaking utterance {} via {}", id, self.engine.name());
        Ok(SpeakOutcome::Started(id))
    }

    /// Cancel the current utterance; its late events will be ignored
    pub fn cancel(&mut self) {
        if let Some(id) = self.current {
            debug!("Cancelling utterance {}", id);
            self.engine.cancel();
        }
        self.clear();
    }

    /// Apply an engine event to the speaking state
    pub fn handle_event(&mut self, event: &SynthesisEvent) -> OutputTransition {
        let (utterance, transition) = match event {
            SynthesisEvent::Started { utterance } => (*utterance, OutputTransition::Confirmed),
            SynthesisEvent::Ended { utterance } => (*utterance, OutputTransition::Finished),
            SynthesisEvent::Error { utterance, message } => {
                (*utterance, OutputTransition::Failed(message.clone()))
            }
        };

        if self.current != Some(utterance) {
            debug!("Ignoring synthesis event for stale utterance {}", utterance);
            return OutputTransition::Ignored;
        }

        match &transition {
            OutputTransition::Confirmed => {}
            OutputTransition::Finished => self.clear(),
            OutputTransition::Failed(message) => {
                warn!("Utterance {} failed: {}", utterance, message);
                self.clear();
            }
            OutputTransition::Ignored => {}
        }

        transition
    }

    fn clear(&mut self) {
        self.current = None;
        self.current_text = None;
        self.state = SpeakingState::Idle;
    }
}
