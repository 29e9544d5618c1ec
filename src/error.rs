use thiserror::Error;

use crate::api::ApiError;
use crate::capture::CaptureError;

/// Failures surfaced by the session orchestrator
///
/// Transient poll errors are deliberately absent: failed question or
/// feedback polls are logged and retried on the next tick, never surfaced.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("answer is empty")]
    EmptyAnswer,

    #[error("failed to submit answer: {0}")]
    Submission(#[source] ApiError),

    #[error("failed to mark session completed: {0}")]
    Finish(#[source] ApiError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("transcription failed: {0}")]
    Transcription(#[source] ApiError),

    #[error("failed to upload session recording: {0}")]
    Upload(#[source] ApiError),

    #[error("no feedback after {0} polls")]
    FeedbackTimeout(u32),
}
