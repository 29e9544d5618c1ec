use std::fs;

use interview_orchestrator::Config;
use tempfile::TempDir;

#[test]
fn defaults_match_the_interview_format() {
    let config = Config::load(None).unwrap();

    assert_eq!(config.interview.duration_secs, 30 * 60);
    assert_eq!(config.interview.question_poll_secs, 2);
    assert_eq!(config.interview.intermission_secs, 5);
    assert_eq!(config.interview.feedback_poll_secs, 2);
    assert!(config.interview.feedback_max_attempts > 0);
    assert!(config.service.base_url.starts_with("http://"));
}

#[test]
fn file_overrides_selected_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orchestrator.toml");
    fs::write(
        &path,
        r#"
[service]
base_url = "https://interviews.example.com/api/"

[interview]
duration_secs = 600
"#,
    )
    .unwrap();

    let config = Config::load(path.to_str()).unwrap();

    assert_eq!(config.service.base_url, "https://interviews.example.com/api/");
    assert_eq!(config.interview.duration_secs, 600);
    // Untouched keys keep their defaults
    assert_eq!(config.interview.intermission_secs, 5);
}
