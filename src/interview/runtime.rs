use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::feedback::FeedbackReply;
use crate::speech::{RecognitionEvent, SpeechRecognizer, SpeechSynthesizer, SynthesisEvent};

use super::error::InterviewError;
use super::orchestrator::{Command, Event, Orchestrator, Outcome};
use super::session::{InterviewView, SessionSnapshot};

const MAILBOX_SIZE: usize = 100;

/// Result of a command, with the session as it stands afterwards
#[derive(Debug, Clone, Serialize)]
pub struct CommandReply {
    pub applied: bool,
    pub session: SessionSnapshot,
}

enum Control {
    Command {
        command: Command,
        reply: oneshot::Sender<Result<CommandReply, InterviewError>>,
    },
    Synthesis(SynthesisEvent),
    Recognition(RecognitionEvent),
    View(oneshot::Sender<InterviewView>),
}

/// Cloneable handle to the task that owns the orchestrator
///
/// All commands and engine events go through one mailbox, so the orchestrator
/// sees them strictly in arrival order. When the last handle is dropped the task
/// stops the session and exits.
#[derive(Clone)]
pub struct InterviewHandle {
    tx: mpsc::Sender<Control>,
}

impl InterviewHandle {
    /// Move the orchestrator into its own task
    pub fn spawn<S, R>(
        orchestrator: Orchestrator<S, R>,
        feedback_rx: mpsc::UnboundedReceiver<FeedbackReply>,
    ) -> (Self, JoinHandle<()>)
    where
        S: SpeechSynthesizer + 'static,
        R: SpeechRecognizer + 'static,
    {
        let (tx, rx) = mpsc::channel(MAILBOX_SIZE);
        let task = tokio::spawn(run(orchestrator, rx, feedback_rx));

        (Self { tx }, task)
    }

    pub async fn start(
        &self,
        questions: Option<Vec<String>>,
    ) -> Result<CommandReply, InterviewError> {
        self.command(Command::Start { questions }).await
    }

    pub async fn next(&self) -> Result<CommandReply, InterviewError> {
        self.command(Command::Next).await
    }

    pub async fn stop(&self) -> Result<CommandReply, InterviewError> {
        self.command(Command::Stop).await
    }

    pub async fn command(&self, command: Command) -> Result<CommandReply, InterviewError> {
        let (reply, rx) = oneshot::channel();
        self.send(Control::Command { command, reply }).await?;
        rx.await.map_err(|_| InterviewError::Closed)?
    }

    pub async fn deliver_synthesis(&self, event: SynthesisEvent) -> Result<(), InterviewError> {
        self.send(Control::Synthesis(event)).await
    }

    pub async fn deliver_recognition(&self, event: RecognitionEvent) -> Result<(), InterviewError> {
        self.send(Control::Recognition(event)).await
    }

    pub async fn view(&self) -> Result<InterviewView, InterviewError> {
        let (reply, rx) = oneshot::channel();
        self.send(Control::View(reply)).await?;
        rx.await.map_err(|_| InterviewError::Closed)
    }

    async fn send(&self, control: Control) -> Result<(), InterviewError> {
        self.tx
            .send(control)
            .await
            .map_err(|_| InterviewError::Closed)
    }
}

async fn run<S, R>(
    mut orchestrator: Orchestrator<S, R>,
    mut rx: mpsc::Receiver<Control>,
    mut feedback_rx: mpsc::UnboundedReceiver<FeedbackReply>,
) where
    S: SpeechSynthesizer,
    R: SpeechRecognizer,
{
    info!("Interview runtime started");

    loop {
        tokio::select! {
            control = rx.recv() => {
                let Some(control) = control else {
                    break;
                };

                match control {
                    Control::Command { command, reply } => {
                        let result = orchestrator
                            .handle(Event::Command(command))
                            .await
                            .map(|outcome| CommandReply {
                                applied: outcome == Outcome::Applied,
                                session: orchestrator.snapshot(),
                            });

                        if reply.send(result).is_err() {
                            debug!("Command caller went away before the reply");
                        }
                    }
                    Control::Synthesis(event) => {
                        if let Err(e) = orchestrator.handle(Event::Synthesis(event)).await {
                            warn!("Synthesis event failed: {}", e);
                        }
                    }
                    Control::Recognition(event) => {
                        if let Err(e) = orchestrator.handle(Event::Recognition(event)).await {
                            warn!("Recognition event failed: {}", e);
                        }
                    }
                    Control::View(reply) => {
                        let _ = reply.send(orchestrator.view());
                    }
                }
            }
            Some(reply) = feedback_rx.recv() => {
                orchestrator.on_feedback(reply);
            }
        }
    }

    orchestrator.stop();
    info!("Interview runtime stopped");
}
