use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::feedback::{FeedbackManager, FeedbackReply, FeedbackResult};
use crate::speech::{
    InputTransition, OutputTransition, RecognitionEvent, SpeakOutcome, SpeechInputController,
    SpeechOutputController, SpeechRecognizer, SpeechSynthesizer, SynthesisEvent,
};
use crate::transcript::TranscriptStore;

use super::error::{Capability, InterviewError};
use super::session::{InterviewView, Session, SessionSnapshot, SessionStatus};

/// User commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Begin a session, optionally replacing the question set
    Start { questions: Option<Vec<String>> },
    Next,
    Stop,
}

/// Everything the orchestrator reacts to
#[derive(Debug, Clone)]
pub enum Event {
    Command(Command),
    Synthesis(SynthesisEvent),
    Recognition(RecognitionEvent),
    Feedback(FeedbackReply),
}

/// Whether an event changed the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored,
}

/// Turn-taking state machine for a voice interview
///
/// Speech output and speech input are never engaged at the same time: listening
/// only starts in reaction to the current utterance's end event, and every
/// utterance is preceded by stopping the recognizer.
pub struct Orchestrator<S, R> {
    questions: Vec<String>,
    session: Session,
    output: SpeechOutputController<S>,
    input: SpeechInputController<R>,
    transcript: TranscriptStore,
    feedback: FeedbackManager,
}

impl<S: SpeechSynthesizer, R: SpeechRecognizer> Orchestrator<S, R> {
    pub fn new(
        questions: Vec<String>,
        output: SpeechOutputController<S>,
        input: SpeechInputController<R>,
        feedback: FeedbackManager,
    ) -> Self {
        Self {
            questions,
            session: Session::default(),
            output,
            input,
            transcript: TranscriptStore::new(),
            feedback,
        }
    }

    /// Dispatch one event to its transition
    pub async fn handle(&mut self, event: Event) -> Result<Outcome, InterviewError> {
        let outcome = match event {
            Event::Command(Command::Start { questions }) => self.start(questions).await?,
            Event::Command(Command::Next) => self.next(),
            Event::Command(Command::Stop) => self.stop(),
            Event::Synthesis(event) => self.on_synthesis(&event),
            Event::Recognition(event) => self.on_recognition(&event),
            Event::Feedback(reply) => self.on_feedback(reply),
        };

        debug_assert!(
            !(self.output.is_speaking() && self.input.is_listening()),
            "speaking and listening at the same time"
        );

        Ok(outcome)
    }

    /// Start a session: reset everything and ask the first question
    pub async fn start(
        &mut self,
        questions: Option<Vec<String>>,
    ) -> Result<Outcome, InterviewError> {
        if self.session.status == SessionStatus::Running {
            debug!("Start ignored, session already running");
            return Ok(Outcome::Ignored);
        }

        if !self.output.is_available() {
            return Err(InterviewError::CapabilityUnavailable(Capability::SpeechOutput));
        }
        if !self.input.is_available() {
            return Err(InterviewError::CapabilityUnavailable(Capability::SpeechInput));
        }

        let questions = questions.unwrap_or_else(|| self.questions.clone());
        if questions.is_empty() {
            return Err(InterviewError::NoQuestions);
        }
        self.questions = questions;

        self.input.stop_listening();
        self.output.reset_session();
        self.transcript.reset();
        let generation = self.feedback.reset();

        let id = Uuid::new_v4();
        self.session = Session {
            status: SessionStatus::Running,
            id: Some(id),
            question_index: 0,
        };

        info!(
            "Interview {} started ({} questions, generation {})",
            id,
            self.questions.len(),
            generation
        );

        self.output.prepare().await;
        self.ask_current();

        Ok(Outcome::Applied)
    }

    /// Move to the next question; no-op past the last one
    pub fn next(&mut self) -> Outcome {
        if self.session.status != SessionStatus::Running {
            debug!("Next ignored, no session running");
            return Outcome::Ignored;
        }

        if self.session.question_index + 1 >= self.questions.len() {
            debug!("Next ignored, already at the last question");
            return Outcome::Ignored;
        }

        // Close the recognizer before the cursor moves so no answer lands on
        // the wrong question
        self.input.stop_listening();
        self.transcript.clear_interim();
        self.session.question_index += 1;

        info!(
            "Advancing to question {}/{}",
            self.session.question_index + 1,
            self.questions.len()
        );

        self.ask_current();
        Outcome::Applied
    }

    /// Stop from any state, leaving output, input and interim buffer quiescent
    pub fn stop(&mut self) -> Outcome {
        self.output.cancel();
        self.input.stop_listening();
        self.transcript.clear_interim();
        self.feedback.invalidate();

        if let Some(id) = self.session.id {
            info!("Interview {} stopped", id);
        }

        self.session.status = SessionStatus::Idle;
        self.session.question_index = 0;

        Outcome::Applied
    }

    pub fn on_synthesis(&mut self, event: &SynthesisEvent) -> Outcome {
        let transition = self.output.handle_event(event);

        if self.session.status != SessionStatus::Running {
            return Outcome::Ignored;
        }

        match transition {
            OutputTransition::Finished => {
                self.begin_listening();
                Outcome::Applied
            }
            // Not a turn boundary: the user can press Next to move on
            OutputTransition::Failed(_) => Outcome::Applied,
            OutputTransition::Confirmed | OutputTransition::Ignored => Outcome::Ignored,
        }
    }

    pub fn on_recognition(&mut self, event: &RecognitionEvent) -> Outcome {
        let transition = self.input.handle_event(event);

        if self.session.status != SessionStatus::Running {
            return Outcome::Ignored;
        }

        match transition {
            InputTransition::Update(update) => {
                for answer in &update.finals {
                    self.record_answer(answer);
                }
                self.transcript.set_interim(&update.interim);
                Outcome::Applied
            }
            InputTransition::Ended | InputTransition::Failed(_) => {
                self.transcript.clear_interim();
                Outcome::Applied
            }
            InputTransition::Confirmed | InputTransition::Ignored => Outcome::Ignored,
        }
    }

    pub fn on_feedback(&mut self, reply: FeedbackReply) -> Outcome {
        if self.feedback.apply(reply) {
            Outcome::Applied
        } else {
            Outcome::Ignored
        }
    }

    fn ask_current(&mut self) {
        let index = self.session.question_index;
        let Some(question) = self.questions.get(index).cloned() else {
            return;
        };

        self.input.stop_listening();

        match self.output.speak(&question) {
            Ok(SpeakOutcome::Started(_)) => {}
            Ok(SpeakOutcome::AlreadySpeaking(id)) => {
                debug!("Question {} already playing as utterance {}", index, id);
            }
            Err(e) => {
                // The user can press Next to move on
                warn!("Could not speak question {}: {}", index, e);
            }
        }

        // Every cursor position gets its question line, spoken or not
        self.transcript.push_assistant(&question);
    }

    fn begin_listening(&mut self) {
        if self.output.is_speaking() {
            debug!("Not listening while speech output is active");
            return;
        }

        if let Err(e) = self.input.start_listening() {
            warn!("Could not start listening: {}", e);
        }
    }

    fn record_answer(&mut self, answer: &str) {
        let index = self.session.question_index;
        let Some(question) = self.questions.get(index) else {
            return;
        };

        self.transcript.push_user(answer, index);
        self.transcript.clear_interim();
        self.feedback.request_feedback(question, answer);
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    pub fn question_index(&self) -> usize {
        self.session.question_index
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn transcript(&self) -> &TranscriptStore {
        &self.transcript
    }

    pub fn feedback(&self) -> Option<&FeedbackResult> {
        self.feedback.latest()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let running = self.session.status == SessionStatus::Running;

        SessionSnapshot {
            status: self.session.status,
            session_id: self.session.id,
            question_index: self.session.question_index,
            question_count: self.questions.len(),
            current_question: running
                .then(|| self.questions.get(self.session.question_index).cloned())
                .flatten(),
            speaking: self.output.state(),
            listening: self.input.state(),
            generation: self.feedback.generation(),
        }
    }

    pub fn view(&self) -> InterviewView {
        InterviewView {
            session: self.snapshot(),
            transcript: self.transcript.snapshot(),
            feedback: self.feedback.latest().cloned(),
        }
    }
}
