//! Voice interview session management
//!
//! This module provides:
//! - `Orchestrator`: the turn-taking state machine (speak question → listen →
//!   record answer and request feedback → next question)
//! - `InterviewHandle`: an actor task that owns one orchestrator and serializes
//!   commands and engine events through a single mailbox
//! - Session state and snapshot types

mod error;
mod orchestrator;
mod runtime;
mod session;

pub use error::{Capability, InterviewError};
pub use orchestrator::{Command, Event, Orchestrator, Outcome};
pub use runtime::{CommandReply, InterviewHandle};
pub use session::{InterviewView, Session, SessionSnapshot, SessionStatus};
