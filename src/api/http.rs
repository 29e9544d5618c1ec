use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use tracing::info;

use super::error::ApiError;
use super::service::SessionService;
use super::types::{
    Feedback, Flag, ListResponse, Session, SessionQuestion, SessionStatus, Transcript,
};
use crate::capture::RecordingArtifact;

/// REST client for the remote session service
pub struct HttpSessionService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSessionService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map non-2xx responses into `ApiError::Status` with the body attached
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl SessionService for HttpSessionService {
    async fn get_session(&self, session_id: i64) -> Result<Session, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("sessions/{}/", session_id)))
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn set_session_status(
        &self,
        session_id: i64,
        status: SessionStatus,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .patch(self.url(&format!("sessions/{}/", session_id)))
            .json(&json!({ "status": status }))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn list_questions(&self, session_id: i64) -> Result<Vec<SessionQuestion>, ApiError> {
        let response = self
            .client
            .get(self.url("session-questions/"))
            .query(&[
                ("session", session_id.to_string()),
                ("ordering", "asked_at".to_string()),
            ])
            .send()
            .await?;

        let list: ListResponse<SessionQuestion> = Self::check(response).await?.json().await?;
        Ok(list.into_vec())
    }

    async fn submit_answer(
        &self,
        session_question_id: i64,
        answer_text: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .patch(self.url(&format!("session-questions/{}/", session_question_id)))
            .json(&json!({ "answer_text": answer_text }))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn request_next_question(&self, session_id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(&format!("sessions/{}/next_question/", session_id)))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn upload_recording(
        &self,
        session_id: i64,
        artifact: &RecordingArtifact,
    ) -> Result<(), ApiError> {
        info!(
            "Uploading session recording: {} ({} bytes)",
            artifact.file_name,
            artifact.data.len()
        );

        let part = Part::bytes(artifact.data.clone())
            .file_name(artifact.file_name.clone())
            .mime_str(artifact.media_type())?;

        let form = Form::new()
            .text("session", session_id.to_string())
            .part("video_url", part);

        let response = self
            .client
            .post(self.url("videos/"))
            .multipart(form)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn get_feedback(&self, session_id: i64) -> Result<Vec<Feedback>, ApiError> {
        let response = self
            .client
            .get(self.url("feedback/"))
            .query(&[("session", session_id.to_string())])
            .send()
            .await?;

        let list: ListResponse<Feedback> = Self::check(response).await?.json().await?;
        Ok(list.into_vec())
    }

    async fn get_flags(&self, session_id: i64) -> Result<Vec<Flag>, ApiError> {
        let response = self
            .client
            .get(self.url("flags/"))
            .query(&[("recording__session", session_id.to_string())])
            .send()
            .await?;

        let list: ListResponse<Flag> = Self::check(response).await?.json().await?;
        Ok(list.into_vec())
    }

    async fn transcribe(&self, audio: &RecordingArtifact) -> Result<Transcript, ApiError> {
        let part = Part::bytes(audio.data.clone())
            .file_name(audio.file_name.clone())
            .mime_str(audio.media_type())?;

        let response = self
            .client
            .post(self.url("transcriptions/"))
            .multipart(Form::new().part("audio", part))
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }
}
