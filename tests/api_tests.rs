// Tests for the remote session service boundary: wire-type decoding and
// the REST client against a mock server.

use interview_orchestrator::{
    ApiError, CaptureKind, Feedback, Flag, HttpSessionService, ListResponse, RecordingArtifact,
    SessionQuestion, SessionService, SessionStatus,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn video_artifact() -> RecordingArtifact {
    RecordingArtifact {
        kind: CaptureKind::AudioVideo,
        file_name: "interview-test.webm".to_string(),
        data: b"not really webm".to_vec(),
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[test]
fn session_question_tolerates_null_fields() {
    let parsed: SessionQuestion = serde_json::from_value(json!({
        "id": 42,
        "question": null,
        "answer_text": null,
        "score": null,
        "confidence": null,
        "asked_at": "2026-08-24T10:00:00Z"
    }))
    .unwrap();

    assert!(parsed.question.is_none());
    assert!(!parsed.is_answered());
    assert!(!parsed.awaiting_score());
}

#[test]
fn answered_but_unscored_question_awaits_its_score() {
    let parsed: SessionQuestion = serde_json::from_value(json!({
        "id": 42,
        "question": { "id": 3, "text": "Explain ownership." },
        "answer_text": "It moves.",
        "asked_at": "2026-08-24T10:00:00Z"
    }))
    .unwrap();

    assert!(parsed.is_answered());
    assert!(parsed.awaiting_score());
}

#[test]
fn list_responses_decode_bare_and_paginated() {
    let bare: ListResponse<Flag> = serde_json::from_value(json!([{
        "id": 1,
        "timestamp": "2026-08-24T10:05:00Z",
        "flag_type": "multiple_faces",
        "description": "second person visible"
    }]))
    .unwrap();
    assert_eq!(bare.into_vec().len(), 1);

    let paginated: ListResponse<Flag> = serde_json::from_value(json!({
        "count": 1,
        "results": [{
            "id": 1,
            "timestamp": "2026-08-24T10:05:00Z",
            "flag_type": "multiple_faces",
            "description": "second person visible"
        }]
    }))
    .unwrap();
    assert_eq!(paginated.into_vec().len(), 1);
}

#[test]
fn feedback_exposes_total_score_from_breakdown() {
    let feedback: Feedback = serde_json::from_value(json!({
        "summary": "good",
        "detailed_breakdown": { "total_score": 7.25, "communication": 8 }
    }))
    .unwrap();
    assert_eq!(feedback.total_score(), Some(7.25));

    let without: Feedback = serde_json::from_value(json!({
        "summary": "good",
        "detailed_breakdown": {}
    }))
    .unwrap();
    assert_eq!(without.total_score(), None);
}

// ============================================================================
// REST client
// ============================================================================

#[tokio::test]
async fn get_session_decodes_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sessions/7/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "started_at": "2026-08-24T10:00:00Z",
            "status": "in_progress"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpSessionService::new(format!("{}/api", server.uri()));
    let session = client.get_session(7).await.unwrap();

    assert_eq!(session.id, 7);
    assert_eq!(session.status, SessionStatus::InProgress);
}

#[tokio::test]
async fn list_questions_queries_by_session_and_ask_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/session-questions/"))
        .and(query_param("session", "7"))
        .and(query_param("ordering", "asked_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{
                "id": 11,
                "question": { "id": 3, "text": "Explain ownership." },
                "asked_at": "2026-08-24T10:00:00Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpSessionService::new(format!("{}/api", server.uri()));
    let questions = client.list_questions(7).await.unwrap();

    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].id, 11);
}

#[tokio::test]
async fn submit_answer_patches_the_session_question() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/session-questions/11/"))
        .and(body_json(json!({ "answer_text": "Paris" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpSessionService::new(format!("{}/api", server.uri()));
    client.submit_answer(11, "Paris").await.unwrap();
}

#[tokio::test]
async fn finishing_patches_the_session_status() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/sessions/7/"))
        .and(body_json(json!({ "status": "completed" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpSessionService::new(format!("{}/api", server.uri()));
    client
        .set_session_status(7, SessionStatus::Completed)
        .await
        .unwrap();
}

#[tokio::test]
async fn upload_sends_the_recording_as_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/videos/"))
        .and(body_string_contains("name=\"session\""))
        .and(body_string_contains("name=\"video_url\""))
        .and(body_string_contains("interview-test.webm"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpSessionService::new(format!("{}/api", server.uri()));
    client.upload_recording(7, &video_artifact()).await.unwrap();
}

#[tokio::test]
async fn transcription_posts_audio_and_decodes_the_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/transcriptions/"))
        .and(body_string_contains("name=\"audio\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "transcript": "hello there" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpSessionService::new(format!("{}/api", server.uri()));
    let artifact = RecordingArtifact {
        kind: CaptureKind::AudioOnly,
        file_name: "answer-test.webm".to_string(),
        data: b"audio bytes".to_vec(),
    };
    let result = client.transcribe(&artifact).await.unwrap();
    assert_eq!(result.transcript, "hello there");
}

#[tokio::test]
async fn non_success_statuses_surface_as_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sessions/9/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpSessionService::new(format!("{}/api", server.uri()));
    let error = client.get_session(9).await.unwrap_err();

    match error {
        ApiError::Status { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "not found");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}
