use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use interview_orchestrator::{
    AnswerMode, Command, Config, HttpSessionService, SessionPhase, SessionRunner, Snapshot,
    SyntheticDevice,
};
use tokio::io::AsyncBufReadExt;
use tracing::info;

/// Drive a timed interview session against the remote session service
#[derive(Debug, Parser)]
#[command(name = "interview-orchestrator")]
struct Args {
    /// Interview session id on the remote service
    #[arg(long)]
    session: i64,

    /// Base URL of the remote session service (overrides config)
    #[arg(long)]
    base_url: Option<String>,

    /// Path to a config file
    #[arg(long)]
    config: Option<String>,

    /// Answer by speech transcription instead of typing
    #[arg(long)]
    spoken: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        config.service.base_url = base_url;
    }

    info!("Interview session {} via {}", args.session, config.service.base_url);

    let service = Arc::new(HttpSessionService::new(config.service.base_url.clone()));
    // TODO: replace with a real camera/microphone capture backend
    let device = Arc::new(SyntheticDevice::default());

    let (runner, control, mut snapshots) =
        SessionRunner::new(service, device, config.interview.clone(), args.session);
    let runner_handle = tokio::spawn(runner.run());

    if args.spoken {
        control.send(Command::SetMode(AnswerMode::Spoken)).await;
    }

    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow().clone();
            render(&snapshot);
        }
    });

    print_help();

    // Plain text becomes the answer draft; slash commands drive the session
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        let delivered = match line {
            "" => continue,
            "/submit" => control.send(Command::Submit).await,
            "/next" => control.send(Command::Advance).await,
            "/finish" => control.send(Command::Finish).await,
            "/record" => control.send(Command::StartAnswerRecording).await,
            "/stop" => control.send(Command::StopAnswerRecording).await,
            "/quit" => break,
            text => control.send(Command::SetDraft(text.to_string())).await,
        };
        if !delivered {
            break;
        }
    }
    drop(control);

    let outcome = runner_handle.await??;
    if let Some(feedback) = outcome.feedback {
        println!("\n=== Interview completed ===");
        if let Some(score) = feedback.total_score() {
            println!("Overall score: {}", score);
        }
        println!("{}", feedback.summary);
        for flag in &outcome.flags {
            println!("[{}] {}: {}", flag.timestamp, flag.flag_type, flag.description);
        }
    }

    Ok(())
}

fn print_help() {
    println!("Type an answer draft, then /submit. Other commands:");
    println!("  /next    advance once the answer is scored");
    println!("  /record  start a spoken answer  (/stop transcribes it)");
    println!("  /finish  end the interview now");
    println!("  /quit    abandon the session");
}

fn render(snapshot: &Snapshot) {
    match snapshot.phase {
        SessionPhase::Loading => println!("Loading session..."),
        SessionPhase::AwaitingResults => println!("Waiting for feedback..."),
        SessionPhase::Done => println!("Session finished."),
        _ => {
            println!("--- {} remaining ---", snapshot.format_remaining());
            for question in snapshot.visible_questions() {
                let prompt = question
                    .question
                    .as_ref()
                    .map(|q| q.text.as_str())
                    .unwrap_or("(generating question...)");
                println!("Q: {}", prompt);
                if let Some(answer) = &question.answer_text {
                    println!("A: {}", answer);
                    match question.score {
                        Some(score) => println!(
                            "   score {} (confidence {:.0}%)",
                            score,
                            question.confidence.unwrap_or(0.0) * 100.0
                        ),
                        None => println!("   waiting for evaluation..."),
                    }
                }
            }
            if let Some(left) = snapshot.intermission_secs {
                println!("Next question in {}s...", left);
            }
            if let Some(error) = &snapshot.last_error {
                println!("Error: {}", error);
            }
        }
    }
}
