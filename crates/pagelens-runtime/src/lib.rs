//! Orchestration runtime — drives one capture from submission to a
//! finalized chat session.

pub mod orchestrator;
pub mod outcome;

pub use orchestrator::{ChatOrchestrator, PLACEHOLDER_USER_MESSAGE};
pub use outcome::{RunOutcome, RunTracker, Stage};
