//! Interview session orchestration
//!
//! This module provides the `SessionRunner` state machine that drives one
//! timed interview session:
//! - Countdown timer derived from the session start time
//! - Periodic question/answer/score polling
//! - Answer submission and the fixed intermission before each next question
//! - Finish guarding and the session-long capture lifecycle
//! - Post-completion recording upload and feedback polling

mod phase;
mod runner;
mod snapshot;
mod ticker;

pub use phase::{AnswerMode, SessionPhase};
pub use runner::{Command, SessionControl, SessionOutcome, SessionRunner};
pub use snapshot::Snapshot;
