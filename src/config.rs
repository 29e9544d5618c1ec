use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub interview: InterviewConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the remote session service API
    pub base_url: String,
}

/// Timing parameters for the session orchestrator
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewConfig {
    /// Total interview duration from session start
    pub duration_secs: u64,

    /// How often the asked-question list is refreshed
    pub question_poll_secs: u64,

    /// Fixed pause between a scored answer and the next question
    pub intermission_secs: u64,

    /// Delay between feedback polls after the recording upload
    pub feedback_poll_secs: u64,

    /// Feedback polls before giving up on results
    pub feedback_max_attempts: u32,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            duration_secs: 30 * 60,
            question_poll_secs: 2,
            intermission_secs: 5,
            feedback_poll_secs: 2,
            feedback_max_attempts: 150, // 5 minutes at the default poll delay
        }
    }
}

impl Config {
    /// Load configuration from coded defaults, overridden by an optional file
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("service.base_url", "http://localhost:8000/api/")?
            .set_default("interview.duration_secs", 30 * 60i64)?
            .set_default("interview.question_poll_secs", 2i64)?
            .set_default("interview.intermission_secs", 5i64)?
            .set_default("interview.feedback_poll_secs", 2i64)?
            .set_default("interview.feedback_max_attempts", 150i64)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}
