pub mod api;
pub mod capture;
pub mod config;
pub mod error;
pub mod session;

pub use api::{
    ApiError, Feedback, Flag, HttpSessionService, ListResponse, Question, Session,
    SessionQuestion, SessionService, SessionStatus, Transcript,
};
pub use capture::{
    CaptureDevice, CaptureError, CaptureHandle, CaptureKind, CaptureState, DeviceStream,
    RecordingArtifact, SyntheticDevice,
};
pub use config::{Config, InterviewConfig, ServiceConfig};
pub use error::SessionError;
pub use session::{
    AnswerMode, Command, SessionControl, SessionOutcome, SessionPhase, SessionRunner, Snapshot,
};
