use serde::Serialize;

use super::phase::{AnswerMode, SessionPhase};
use crate::api::{Feedback, Flag, SessionQuestion};

/// Observable session state, published after every transition
///
/// This is the read-only surface a UI layer renders from; the orchestrator
/// owns the mutable state and the UI only ever sees these copies.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub mode: AnswerMode,
    pub remaining_secs: u64,
    pub questions: Vec<SessionQuestion>,
    pub draft: String,
    /// Seconds left in the current intermission, if one is running
    pub intermission_secs: Option<u64>,
    pub submitting: bool,
    pub loading_next: bool,
    pub recording_answer: bool,
    pub last_error: Option<String>,
    pub feedback: Option<Feedback>,
    pub flags: Vec<Flag>,
}

impl Snapshot {
    pub(crate) fn initial() -> Self {
        Self {
            phase: SessionPhase::Loading,
            mode: AnswerMode::default(),
            remaining_secs: 0,
            questions: Vec::new(),
            draft: String::new(),
            intermission_secs: None,
            submitting: false,
            loading_next: false,
            recording_answer: false,
            last_error: None,
            feedback: None,
            flags: Vec::new(),
        }
    }

    /// The question currently in front of the candidate
    pub fn current_question(&self) -> Option<&SessionQuestion> {
        self.questions.last()
    }

    pub fn awaiting_score(&self) -> bool {
        self.current_question().is_some_and(|q| q.awaiting_score())
    }

    /// Questions a UI should render
    ///
    /// During intermission the tail of the list is hidden: the freshly
    /// requested question may not be fully initialized yet.
    pub fn visible_questions(&self) -> &[SessionQuestion] {
        if self.intermission_secs.is_some() && !self.questions.is_empty() {
            &self.questions[..self.questions.len() - 1]
        } else {
            &self.questions
        }
    }

    /// Remaining time rendered as MM:SS
    pub fn format_remaining(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}
