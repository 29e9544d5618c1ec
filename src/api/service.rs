use async_trait::async_trait;

use super::error::ApiError;
use super::types::{Feedback, Flag, Session, SessionQuestion, SessionStatus, Transcript};
use crate::capture::RecordingArtifact;

/// Operations the orchestrator consumes from the remote session service
///
/// Scoring, transcription and feedback generation are opaque server-side
/// concerns; this trait only covers the reads and writes the session view
/// needs. Implementations must be safe to share across spawned tasks.
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn get_session(&self, session_id: i64) -> Result<Session, ApiError>;

    async fn set_session_status(
        &self,
        session_id: i64,
        status: SessionStatus,
    ) -> Result<(), ApiError>;

    /// Asked questions for the session, ordered by ask time
    async fn list_questions(&self, session_id: i64) -> Result<Vec<SessionQuestion>, ApiError>;

    async fn submit_answer(
        &self,
        session_question_id: i64,
        answer_text: &str,
    ) -> Result<(), ApiError>;

    async fn request_next_question(&self, session_id: i64) -> Result<(), ApiError>;

    /// Multipart upload of the finalized session recording
    async fn upload_recording(
        &self,
        session_id: i64,
        artifact: &RecordingArtifact,
    ) -> Result<(), ApiError>;

    /// Empty until the service has processed the uploaded recording
    async fn get_feedback(&self, session_id: i64) -> Result<Vec<Feedback>, ApiError>;

    async fn get_flags(&self, session_id: i64) -> Result<Vec<Flag>, ApiError>;

    async fn transcribe(&self, audio: &RecordingArtifact) -> Result<Transcript, ApiError>;
}
