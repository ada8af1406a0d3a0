// Scripted engines and a fake scoring client shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use mockmate::config::{FeedbackConfig, RecognitionConfig, SpeechConfig};
use mockmate::feedback::{
    FeedbackClient, FeedbackError, FeedbackManager, FeedbackReply, FeedbackRequest,
    FeedbackResult,
};
use mockmate::interview::Orchestrator;
use mockmate::speech::{
    EngineError, RecognitionAlternative, RecognitionEvent, RecognitionSessionId,
    SpeechInputController, SpeechOutputController, SpeechRecognizer, SpeechSynthesizer,
    Utterance, Voice,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// ============================================================================
// Speech output
// ============================================================================

#[derive(Debug, Default)]
pub struct SynthState {
    pub available: bool,
    pub voices: Vec<Voice>,
    pub spoken: Vec<Utterance>,
    pub cancels: usize,
    pub reject_next: bool,
}

#[derive(Clone)]
pub struct FakeSynthesizer {
    pub state: Arc<Mutex<SynthState>>,
}

impl FakeSynthesizer {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SynthState {
                available: true,
                voices: vec![Voice {
                    name: "Samantha".to_string(),
                    locale: "en-US".to_string(),
                    is_default: true,
                }],
                ..Default::default()
            })),
        }
    }

    pub fn without_voices() -> Self {
        let synth = Self::new();
        synth.state.lock().unwrap().voices.clear();
        synth
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .spoken
            .iter()
            .map(|u| u.text.clone())
            .collect()
    }

    pub fn last_utterance(&self) -> Utterance {
        self.state
            .lock()
            .unwrap()
            .spoken
            .last()
            .cloned()
            .expect("nothing was spoken")
    }

    pub fn cancels(&self) -> usize {
        self.state.lock().unwrap().cancels
    }
}

impl SpeechSynthesizer for FakeSynthesizer {
    fn is_available(&self) -> bool {
        self.state.lock().unwrap().available
    }

    fn voices(&self) -> Vec<Voice> {
        self.state.lock().unwrap().voices.clone()
    }

    fn speak(&mut self, utterance: Utterance) -> Result<(), EngineError> {
        let mut state = self.state.lock().unwrap();
        if state.reject_next {
            state.reject_next = false;
            return Err(EngineError::Rejected("audio device busy".to_string()));
        }
        state.spoken.push(utterance);
        Ok(())
    }

    fn cancel(&mut self) {
        self.state.lock().unwrap().cancels += 1;
    }

    fn name(&self) -> &str {
        "fake-tts"
    }
}

// ============================================================================
// Speech input
// ============================================================================

#[derive(Debug, Default)]
pub struct RecogState {
    pub available: bool,
    pub started: Vec<RecognitionSessionId>,
    pub stopped: Vec<RecognitionSessionId>,
    pub reject_next: bool,
}

#[derive(Clone)]
pub struct FakeRecognizer {
    pub state: Arc<Mutex<RecogState>>,
}

impl FakeRecognizer {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RecogState {
                available: true,
                ..Default::default()
            })),
        }
    }

    pub fn started(&self) -> Vec<RecognitionSessionId> {
        self.state.lock().unwrap().started.clone()
    }

    pub fn stopped(&self) -> Vec<RecognitionSessionId> {
        self.state.lock().unwrap().stopped.clone()
    }
}

impl SpeechRecognizer for FakeRecognizer {
    fn is_available(&self) -> bool {
        self.state.lock().unwrap().available
    }

    fn start(
        &mut self,
        session: RecognitionSessionId,
        _config: &RecognitionConfig,
    ) -> Result<(), EngineError> {
        let mut state = self.state.lock().unwrap();
        if state.reject_next {
            state.reject_next = false;
            return Err(EngineError::Rejected("microphone permission denied".to_string()));
        }
        state.started.push(session);
        Ok(())
    }

    fn stop(&mut self, session: RecognitionSessionId) {
        self.state.lock().unwrap().stopped.push(session);
    }

    fn name(&self) -> &str {
        "fake-stt"
    }
}

pub fn final_result(session: RecognitionSessionId, text: &str) -> RecognitionEvent {
    RecognitionEvent::Result {
        session,
        results: vec![RecognitionAlternative {
            is_final: true,
            transcript: text.to_string(),
        }],
    }
}

pub fn interim_result(session: RecognitionSessionId, text: &str) -> RecognitionEvent {
    RecognitionEvent::Result {
        session,
        results: vec![RecognitionAlternative {
            is_final: false,
            transcript: text.to_string(),
        }],
    }
}

// ============================================================================
// Feedback
// ============================================================================

/// Scores instantly unless a delay is configured for the answer.
/// The returned result lists the answer as its only strength.
#[derive(Clone, Default)]
pub struct FakeFeedbackClient {
    pub requests: Arc<Mutex<Vec<FeedbackRequest>>>,
    pub delays: Arc<Mutex<HashMap<String, Duration>>>,
    pub failing: Arc<Mutex<bool>>,
}

impl FakeFeedbackClient {
    pub fn delay(&self, answer: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(answer.to_string(), delay);
    }

    pub fn fail_all(&self) {
        *self.failing.lock().unwrap() = true;
    }

    pub fn requests(&self) -> Vec<FeedbackRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedbackClient for FakeFeedbackClient {
    async fn evaluate(&self, request: &FeedbackRequest) -> Result<FeedbackResult, FeedbackError> {
        self.requests.lock().unwrap().push(request.clone());

        let delay = self.delays.lock().unwrap().get(&request.answer).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.failing.lock().unwrap() {
            return Err(FeedbackError::Status {
                status: 503,
                message: "scoring unavailable".to_string(),
            });
        }

        Ok(FeedbackResult {
            score: Some(7.0),
            strengths: vec![request.answer.clone()],
            gaps: vec!["Quantify the outcome".to_string()],
            improved_answer: None,
        })
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub orchestrator: Orchestrator<FakeSynthesizer, FakeRecognizer>,
    pub synth: FakeSynthesizer,
    pub recog: FakeRecognizer,
    pub scorer: FakeFeedbackClient,
    pub feedback_rx: mpsc::UnboundedReceiver<FeedbackReply>,
}

pub fn questions() -> Vec<String> {
    vec![
        "Tell me about yourself.".to_string(),
        "Describe a time you led a team.".to_string(),
        "Why do you want this role?".to_string(),
    ]
}

pub fn harness() -> Harness {
    harness_with(FakeSynthesizer::new(), FakeRecognizer::new())
}

pub fn harness_with(synth: FakeSynthesizer, recog: FakeRecognizer) -> Harness {
    let scorer = FakeFeedbackClient::default();

    let output = SpeechOutputController::new(synth.clone(), SpeechConfig::default());
    let input = SpeechInputController::new(recog.clone(), RecognitionConfig::default());
    let (feedback, feedback_rx) =
        FeedbackManager::new(Arc::new(scorer.clone()), FeedbackConfig::default());

    Harness {
        orchestrator: Orchestrator::new(questions(), output, input, feedback),
        synth,
        recog,
        scorer,
        feedback_rx,
    }
}
