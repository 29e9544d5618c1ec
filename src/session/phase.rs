use serde::{Deserialize, Serialize};

/// Explicit session lifecycle, instead of inferring it from data shape
///
/// `Finishing` rolls back to `Active` when the completion call fails, so
/// finishing stays retryable. `AwaitingResults` covers recording upload
/// and feedback polling; `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Loading,
    Active,
    Finishing,
    Completed,
    AwaitingResults,
    Done,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Done)
    }
}

/// How the candidate produces the current answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMode {
    #[default]
    Typed,
    Spoken,
}
