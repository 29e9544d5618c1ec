use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an interview session on the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    InProgress,
    Completed,
}

/// One timed interview attempt, owned by the remote service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub started_at: DateTime<Utc>,
    pub status: SessionStatus,
}

/// Immutable question prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
}

/// An asked-question record within a session
///
/// Ordered by `asked_at`; the last element of the list is the question
/// currently in front of the candidate. `question` can be null while the
/// server is still generating the prompt text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionQuestion {
    pub id: i64,
    #[serde(default)]
    pub question: Option<Question>,
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    pub asked_at: DateTime<Utc>,
}

impl SessionQuestion {
    pub fn is_answered(&self) -> bool {
        self.answer_text.as_deref().is_some_and(|a| !a.is_empty())
    }

    /// Answered but the evaluation has not come back yet
    pub fn awaiting_score(&self) -> bool {
        self.is_answered() && self.score.is_none()
    }
}

/// Post-session evaluation computed by the remote service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub summary: String,
    /// Free-form breakdown; the service includes at least `total_score`
    pub detailed_breakdown: serde_json::Value,
}

impl Feedback {
    pub fn total_score(&self) -> Option<f64> {
        self.detailed_breakdown.get("total_score").and_then(|v| v.as_f64())
    }
}

/// Integrity flag raised by server-side analysis of the session recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flag {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub flag_type: String,
    pub description: String,
}

/// Transcription result for a spoken answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub transcript: String,
}

/// List endpoints return either a bare array or a paginated envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated { results: Vec<T> },
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Paginated { results } => results,
            ListResponse::Plain(items) => items,
        }
    }
}
