use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use super::phase::{AnswerMode, SessionPhase};
use super::snapshot::Snapshot;
use super::ticker::Ticker;
use crate::api::{Feedback, Flag, Session, SessionQuestion, SessionService, SessionStatus};
use crate::capture::{CaptureDevice, CaptureHandle, CaptureKind, RecordingArtifact};
use crate::config::InterviewConfig;
use crate::error::SessionError;

/// User and system actions accepted by a running session
#[derive(Debug, Clone)]
pub enum Command {
    SetMode(AnswerMode),
    SetDraft(String),
    Submit,
    /// Manual advance to the next question once the current answer is scored
    Advance,
    Finish,
    StartAnswerRecording,
    StopAnswerRecording,
}

/// Internal event queue: timer ticks and forwarded commands interleaved
/// on one logical thread
#[derive(Debug, Clone)]
pub(crate) enum Event {
    CountdownTick,
    PollTick,
    IntermissionTick,
    Command(Command),
    /// The control handle was dropped; the session view is being torn down
    Closed,
}

/// Handle for driving a running session
#[derive(Clone)]
pub struct SessionControl {
    tx: mpsc::Sender<Command>,
}

impl SessionControl {
    /// Returns false once the session has ended
    pub async fn send(&self, command: Command) -> bool {
        self.tx.send(command).await.is_ok()
    }
}

/// Final results of a completed session
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub feedback: Option<Feedback>,
    pub flags: Vec<Flag>,
}

/// Drives one interview session from load to completion
///
/// Owns every piece of mutable session state. Three repeating timers feed
/// the event queue: the countdown (1s), the question poll (2s) and, while
/// one is running, the intermission countdown (1s). Each is independently
/// cancelable; all are canceled on teardown.
pub struct SessionRunner {
    service: Arc<dyn SessionService>,
    device: Arc<dyn CaptureDevice>,
    config: InterviewConfig,
    session_id: i64,

    session: Option<Session>,
    phase: SessionPhase,
    mode: AnswerMode,
    remaining_secs: u64,
    questions: Vec<SessionQuestion>,
    draft: String,
    intermission_secs: Option<u64>,
    submitting: bool,
    loading_next: bool,
    last_error: Option<String>,
    feedback: Option<Feedback>,
    flags: Vec<Flag>,

    /// Session-long audio/video capture
    capture: CaptureHandle,
    /// At most one per-answer audio capture at a time
    answer_capture: Option<CaptureHandle>,

    events_tx: mpsc::Sender<Event>,
    events_rx: mpsc::Receiver<Event>,
    commands_rx: Option<mpsc::Receiver<Command>>,
    countdown: Ticker,
    poller: Ticker,
    intermission: Ticker,
    snapshot_tx: watch::Sender<Snapshot>,
}

impl SessionRunner {
    pub fn new(
        service: Arc<dyn SessionService>,
        device: Arc<dyn CaptureDevice>,
        config: InterviewConfig,
        session_id: i64,
    ) -> (Self, SessionControl, watch::Receiver<Snapshot>) {
        let (events_tx, events_rx) = mpsc::channel(64);
        let (commands_tx, commands_rx) = mpsc::channel(16);
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::initial());

        let runner = Self {
            service,
            device,
            config,
            session_id,
            session: None,
            phase: SessionPhase::Loading,
            mode: AnswerMode::default(),
            remaining_secs: 0,
            questions: Vec::new(),
            draft: String::new(),
            intermission_secs: None,
            submitting: false,
            loading_next: false,
            last_error: None,
            feedback: None,
            flags: Vec::new(),
            capture: CaptureHandle::new(CaptureKind::AudioVideo),
            answer_capture: None,
            events_tx,
            events_rx,
            commands_rx: Some(commands_rx),
            countdown: Ticker::new(),
            poller: Ticker::new(),
            intermission: Ticker::new(),
            snapshot_tx,
        };

        (runner, SessionControl { tx: commands_tx }, snapshot_rx)
    }

    /// Run the session to completion or teardown
    pub async fn run(mut self) -> Result<SessionOutcome> {
        self.spawn_command_forwarder();

        self.load().await?;

        // A session reloaded past its deadline finishes straight away
        if self.remaining_secs == 0 && self.phase == SessionPhase::Active {
            self.finish().await;
            self.publish();
        }

        while !self.phase.is_terminal() {
            let Some(event) = self.events_rx.recv().await else {
                break;
            };

            match event {
                Event::CountdownTick => self.on_countdown_tick().await,
                Event::PollTick => self.refresh_questions().await,
                Event::IntermissionTick => self.on_intermission_tick().await,
                Event::Command(command) => self.on_command(command).await,
                Event::Closed => break,
            }

            self.publish();
        }

        self.teardown().await;
        self.publish();

        Ok(SessionOutcome {
            feedback: self.feedback.clone(),
            flags: self.flags.clone(),
        })
    }

    /// Map the command channel onto the event queue; channel closure
    /// becomes the teardown event
    fn spawn_command_forwarder(&mut self) {
        let Some(mut commands_rx) = self.commands_rx.take() else {
            return;
        };
        let events_tx = self.events_tx.clone();

        tokio::spawn(async move {
            while let Some(command) = commands_rx.recv().await {
                if events_tx.send(Event::Command(command)).await.is_err() {
                    return;
                }
            }
            let _ = events_tx.send(Event::Closed).await;
        });
    }

    async fn load(&mut self) -> Result<()> {
        let session = self
            .service
            .get_session(self.session_id)
            .await
            .context("failed to load session")?;

        info!(
            "Loaded session {} (started {})",
            session.id, session.started_at
        );

        let elapsed = Utc::now()
            .signed_duration_since(session.started_at)
            .num_seconds();
        self.remaining_secs = (self.config.duration_secs as i64 - elapsed).max(0) as u64;
        self.session = Some(session);

        // Initial question list; later failures are retried by the poller
        self.refresh_questions().await;

        // A missing camera/microphone never blocks the interview itself
        if let Err(e) = self.capture.start(self.device.as_ref()).await {
            error!("Session recording unavailable: {}", e);
            self.surface(SessionError::Capture(e));
        }

        if self.remaining_secs > 0 {
            self.start_countdown();
        }
        self.poller.start(
            Duration::from_secs(self.config.question_poll_secs),
            self.events_tx.clone(),
            Event::PollTick,
        );

        self.phase = SessionPhase::Active;
        self.publish();
        Ok(())
    }

    /// (Re)start the countdown; replaces any previous schedule
    fn start_countdown(&mut self) {
        self.countdown.start(
            Duration::from_secs(1),
            self.events_tx.clone(),
            Event::CountdownTick,
        );
    }

    async fn on_countdown_tick(&mut self) {
        if self.remaining_secs == 0 {
            return;
        }
        self.remaining_secs -= 1;

        if self.remaining_secs == 0 {
            // Cancel before finishing so zero triggers exactly once
            self.countdown.cancel();
            info!("Interview time elapsed, finishing session");
            self.finish().await;
        }
    }

    /// Wholesale replace of the question cache; a failed poll is skipped
    /// and retried on the next tick
    async fn refresh_questions(&mut self) {
        match self.service.list_questions(self.session_id).await {
            Ok(list) => self.questions = list,
            Err(e) => warn!("Question poll failed, retrying next tick: {}", e),
        }
    }

    async fn on_command(&mut self, command: Command) {
        match command {
            Command::SetMode(mode) => {
                if self.phase == SessionPhase::Active {
                    self.mode = mode;
                }
            }
            Command::SetDraft(text) => {
                if !self.submitting {
                    self.draft = text;
                }
            }
            Command::Submit => self.submit().await,
            Command::Advance => self.advance(),
            Command::Finish => self.finish().await,
            Command::StartAnswerRecording => self.start_answer_recording().await,
            Command::StopAnswerRecording => self.stop_answer_recording().await,
        }
    }

    /// Persist the current answer, then hand off to the intermission
    async fn submit(&mut self) {
        if self.submitting || self.phase != SessionPhase::Active {
            return;
        }
        if self.intermission_secs.is_some() {
            return;
        }

        let text = self.draft.trim().to_string();
        if text.is_empty() {
            self.surface(SessionError::EmptyAnswer);
            return;
        }

        let Some(current) = self.questions.last() else {
            return;
        };
        if current.is_answered() {
            return;
        }
        let question_id = current.id;

        self.submitting = true;
        self.last_error = None;
        self.publish();

        match self.service.submit_answer(question_id, &text).await {
            Ok(()) => {
                info!("Answer submitted for question {}", question_id);
                self.draft.clear();
                self.submitting = false;
                // Surface the stored answer (and eventually its score)
                self.refresh_questions().await;
                self.enter_intermission();
            }
            Err(e) => {
                // Draft retained so the candidate can retry
                self.submitting = false;
                self.surface(SessionError::Submission(e));
            }
        }
    }

    /// Manual advance, only once the current answer has been scored
    fn advance(&mut self) {
        if self.phase != SessionPhase::Active {
            return;
        }
        let Some(current) = self.questions.last() else {
            return;
        };
        if !current.is_answered() || current.score.is_none() {
            return;
        }
        self.enter_intermission();
    }

    /// Single entry point for the fixed pause before the next question
    fn enter_intermission(&mut self) {
        if self.intermission_secs.is_some() {
            warn!("Intermission already running, ignoring");
            return;
        }

        self.intermission_secs = Some(self.config.intermission_secs);
        self.intermission.start(
            Duration::from_secs(1),
            self.events_tx.clone(),
            Event::IntermissionTick,
        );
    }

    async fn on_intermission_tick(&mut self) {
        let Some(left) = self.intermission_secs else {
            return;
        };

        let left = left.saturating_sub(1);
        if left > 0 {
            self.intermission_secs = Some(left);
            return;
        }

        self.intermission.cancel();
        self.intermission_secs = None;
        self.request_next_question().await;
    }

    async fn request_next_question(&mut self) {
        self.loading_next = true;
        self.publish();

        if let Err(e) = self.service.request_next_question(self.session_id).await {
            // The poller will still surface whatever the server has
            warn!("Next question request failed: {}", e);
        }
        self.refresh_questions().await;

        self.loading_next = false;
    }

    /// Mark the session completed, stop the recording and collect results
    ///
    /// Refused while the current answer is still awaiting its score or
    /// while a finish is already in flight. A failed completion call rolls
    /// back to `Active` so finishing can be retried.
    async fn finish(&mut self) {
        if self.phase != SessionPhase::Active {
            return;
        }
        if self.questions.last().is_some_and(|q| q.awaiting_score()) {
            info!("Finish refused: current answer is awaiting its score");
            return;
        }

        self.phase = SessionPhase::Finishing;
        self.last_error = None;
        self.publish();

        if let Err(e) = self
            .service
            .set_session_status(self.session_id, SessionStatus::Completed)
            .await
        {
            self.phase = SessionPhase::Active;
            self.surface(SessionError::Finish(e));
            return;
        }

        if let Some(session) = self.session.as_mut() {
            session.status = SessionStatus::Completed;
        }
        self.phase = SessionPhase::Completed;
        self.countdown.cancel();
        info!("Session {} marked completed", self.session_id);

        let artifact = self.capture.stop().await;
        self.publish();

        if let Some(artifact) = artifact {
            self.phase = SessionPhase::AwaitingResults;
            self.publish();

            match self.await_results(artifact).await {
                Ok((feedback, flags)) => {
                    self.feedback = Some(feedback);
                    self.flags = flags;
                }
                Err(e) => self.surface(e),
            }
        } else {
            // No recording was ever produced, so there is nothing to
            // upload and no feedback to wait for
            warn!("Session ended without a recording artifact");
        }

        self.phase = SessionPhase::Done;
        self.poller.cancel();
    }

    /// Upload the recording, then poll until feedback exists
    ///
    /// Feedback polling never starts before the upload has been issued;
    /// it stops at the first feedback record or after the configured
    /// number of attempts.
    async fn await_results(
        &mut self,
        artifact: RecordingArtifact,
    ) -> Result<(Feedback, Vec<Flag>), SessionError> {
        self.service
            .upload_recording(self.session_id, &artifact)
            .await
            .map_err(SessionError::Upload)?;

        let delay = Duration::from_secs(self.config.feedback_poll_secs);

        for attempt in 1..=self.config.feedback_max_attempts {
            match self.service.get_feedback(self.session_id).await {
                Ok(mut list) if !list.is_empty() => {
                    let feedback = list.remove(0);
                    let flags = match self.service.get_flags(self.session_id).await {
                        Ok(flags) => flags,
                        Err(e) => {
                            warn!("Flag fetch failed: {}", e);
                            Vec::new()
                        }
                    };
                    return Ok((feedback, flags));
                }
                Ok(_) => {}
                Err(e) => warn!("Feedback poll failed (attempt {}): {}", attempt, e),
            }

            tokio::time::sleep(delay).await;
        }

        Err(SessionError::FeedbackTimeout(
            self.config.feedback_max_attempts,
        ))
    }

    /// Acquire the audio-only device for a spoken answer
    async fn start_answer_recording(&mut self) {
        if self.phase != SessionPhase::Active || self.mode != AnswerMode::Spoken {
            return;
        }
        if self.answer_capture.is_some() || self.submitting {
            return;
        }

        let mut handle = CaptureHandle::new(CaptureKind::AudioOnly);
        match handle.start(self.device.as_ref()).await {
            Ok(()) => self.answer_capture = Some(handle),
            Err(e) => self.surface(SessionError::Capture(e)),
        }
    }

    /// Stop the answer recording and transcribe it into the draft
    ///
    /// On transcription failure the draft is left exactly as it was, so
    /// the candidate can still type the answer.
    async fn stop_answer_recording(&mut self) {
        let Some(mut handle) = self.answer_capture.take() else {
            return;
        };
        let Some(artifact) = handle.stop().await else {
            return;
        };

        match self.service.transcribe(&artifact).await {
            Ok(result) => {
                info!("Transcribed spoken answer ({} chars)", result.transcript.len());
                self.draft = result.transcript;
            }
            Err(e) => warn!("{}", SessionError::Transcription(e)),
        }
    }

    /// Cancel all timers and release every capture device
    ///
    /// Runs on every exit path, including teardown before a natural
    /// finish, so device streams never leak.
    async fn teardown(&mut self) {
        self.countdown.cancel();
        self.poller.cancel();
        self.intermission.cancel();

        if let Some(mut handle) = self.answer_capture.take() {
            let _ = handle.stop().await;
        }
        let _ = self.capture.stop().await;
    }

    fn surface(&mut self, error: SessionError) {
        warn!("Session error: {}", error);
        self.last_error = Some(error.to_string());
    }

    fn publish(&self) {
        let _ = self.snapshot_tx.send(Snapshot {
            phase: self.phase,
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            questions: self.questions.clone(),
            draft: self.draft.clone(),
            intermission_secs: self.intermission_secs,
            submitting: self.submitting,
            loading_next: self.loading_next,
            recording_answer: self.answer_capture.is_some(),
            last_error: self.last_error.clone(),
            feedback: self.feedback.clone(),
            flags: self.flags.clone(),
        });
    }
}
