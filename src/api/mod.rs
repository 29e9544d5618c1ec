//! Remote session service boundary
//!
//! The interview backend owns all persistent state: sessions, asked
//! questions, answers, scores, feedback and integrity flags. This module
//! provides the typed wire model, the `SessionService` trait the
//! orchestrator is written against, and the REST implementation.

mod error;
mod http;
mod service;
mod types;

pub use error::ApiError;
pub use http::HttpSessionService;
pub use service::SessionService;
pub use types::{
    Feedback, Flag, ListResponse, Question, Session, SessionQuestion, SessionStatus, Transcript,
};
