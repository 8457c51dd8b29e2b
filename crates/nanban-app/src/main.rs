//! Nanban application binary - composition root.
//!
//! Ties together all Nanban crates into a single executable:
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Install the tracing subscriber
//! 3. Build the controller (recognizers, translator, conversation log)
//! 4. Run the requested subcommand

mod cli;
mod controller;
mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::sync::broadcast::error::RecvError;

use nanban_conversation::{ConversationEntry, ConversationLog, EntryKind};
use nanban_core::config::NanbanConfig;
use nanban_core::types::format_gloss;
use nanban_playback::{PlaybackPhase, PlaybackScheduler, PlaybackTiming};
use nanban_recognition::CaptureFrame;
use nanban_storage::{word_gloss, FileKeyValueStore, Phrasebook};

use crate::cli::{CliArgs, Command, PhrasesCommand};
use crate::controller::Controller;
use crate::output::{TracingHaptics, TracingSpeechOutput};

type AppController = Controller<TracingSpeechOutput, TracingHaptics>;

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}

/// Synthetic camera frame used while no capture device is attached.
fn placeholder_frame() -> CaptureFrame {
    CaptureFrame::new(640, 480, vec![0; 640 * 480 * 3])
}

fn print_entry(entry: &ConversationEntry) {
    let time = entry
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M:%S");
    match entry.kind {
        EntryKind::Speech => {
            println!("[{time}] #{} speech: {}", entry.id, entry.text);
            if let Some(gloss) = &entry.gloss {
                println!("           gloss: {}", format_gloss(gloss));
            }
        }
        EntryKind::Sign => {
            println!("[{time}] #{} sign: {}", entry.id, entry.text);
            for candidate in entry.candidates.iter().flatten() {
                println!("           {:<14} {:>3}%", candidate.label, candidate.percent());
            }
        }
    }
}

fn print_log(log: &ConversationLog) {
    if log.is_empty() {
        println!("(no conversation yet)");
        return;
    }
    for entry in log.latest_first() {
        print_entry(entry);
    }
}

/// Play `tokens` and print each token as it is highlighted, returning once
/// playback is back to Idle.
async fn play_gloss(tokens: Vec<String>, timing: PlaybackTiming) {
    let scheduler = PlaybackScheduler::new(timing);
    let mut events = scheduler.subscribe();
    if !scheduler.play(tokens) {
        println!("(nothing to play)");
        return;
    }

    loop {
        match events.recv().await {
            Ok(event) => match event.phase {
                PlaybackPhase::Attack => {
                    if let Some(token) = &event.token {
                        println!("  > {token}");
                    }
                }
                PlaybackPhase::Idle => break,
                _ => {}
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Playback events dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn run_translate(
    controller: &mut AppController,
    text: &str,
    play: bool,
    timing: PlaybackTiming,
) {
    let Some(entry) = controller.translate(text) else {
        println!("(no gloss for empty input)");
        return;
    };
    let gloss = entry.gloss.clone().unwrap_or_default();
    print_entry(entry);
    if play {
        play_gloss(gloss, timing).await;
    }
}

async fn run_listen(controller: &mut AppController, play: bool, timing: PlaybackTiming) {
    println!("Listening...");
    let Some(entry) = controller.listen().await else {
        println!("(nothing recognized)");
        return;
    };
    let gloss = entry.gloss.clone().unwrap_or_default();
    print_entry(entry);
    if play {
        play_gloss(gloss, timing).await;
    }
}

async fn run_sign(controller: &mut AppController) {
    println!("Recognizing signs...");
    match controller.recognize_sign(&placeholder_frame()).await {
        Some(entry) => print_entry(entry),
        None => println!("(no signs recognized)"),
    }
}

fn run_phrases(
    action: PhrasesCommand,
    store_path: &Path,
    controller: &AppController,
) -> nanban_core::Result<()> {
    let mut book = Phrasebook::load_or_default(FileKeyValueStore::new(store_path));

    match action {
        PhrasesCommand::List { category, query } => {
            let phrases = book.filter(category, &query);
            if phrases.is_empty() {
                println!("(no matching phrases)");
            }
            for phrase in phrases {
                let star = if phrase.is_favorite { "*" } else { " " };
                println!(
                    "{star} {:<38} {:<10} {}  [{}]",
                    phrase.text,
                    phrase.category,
                    format_gloss(&phrase.gloss),
                    phrase.id
                );
            }
        }
        PhrasesCommand::Add { text, category } => {
            let text = text.join(" ");
            match book.add(&text, word_gloss(&text), category)? {
                Some(phrase) => println!("Saved [{}] {}", phrase.id, format_gloss(&phrase.gloss)),
                None => println!("(phrase text is empty)"),
            }
        }
        PhrasesCommand::Remove { id } => {
            if book.remove(&id)? {
                println!("Removed {id}");
            } else {
                println!("No phrase with id {id}");
            }
        }
        PhrasesCommand::Favorite { id } => {
            if book.toggle_favorite(&id)? {
                let favorite = book.get(&id).is_some_and(|p| p.is_favorite);
                println!("{id} favorite: {favorite}");
            } else {
                println!("No phrase with id {id}");
            }
        }
        PhrasesCommand::Speak { id } => match book.get(&id) {
            Some(phrase) => {
                println!("{}", phrase.text);
                controller.speak(&phrase.text);
            }
            None => println!("No phrase with id {id}"),
        },
    }
    Ok(())
}

/// Scripted exchange: two spoken turns, a typed reply and a signed answer.
async fn run_demo(
    controller: &mut AppController,
    timing: PlaybackTiming,
    json: bool,
) -> nanban_core::Result<()> {
    run_listen(controller, true, timing).await;
    run_sign(controller).await;
    run_translate(controller, "Nice to meet you", true, timing).await;
    run_listen(controller, false, timing).await;
    run_sign(controller).await;

    println!();
    println!("Conversation (latest first):");
    print_log(controller.log());

    if json {
        println!("{}", controller.log().to_json()?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config (read before tracing so its log level applies).
    let config_file = args.resolve_config_path();
    let loaded = NanbanConfig::load(&config_file);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => NanbanConfig::default(),
    };

    // Tracing.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Nanban v{}", env!("CARGO_PKG_VERSION"));
    match loaded {
        Ok(_) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Err(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config. Using defaults."
        ),
    }

    let data_dir = resolve_data_dir(
        &args
            .resolve_data_dir()
            .unwrap_or_else(|| config.general.data_dir.clone()),
    );
    let timing = PlaybackTiming::from(&config.playback);
    let mut controller = Controller::from_config(&config, TracingSpeechOutput, TracingHaptics);

    match args.command {
        Command::Translate { text, play } => {
            run_translate(&mut controller, &text.join(" "), play, timing).await;
        }
        Command::Listen { play } => run_listen(&mut controller, play, timing).await,
        Command::Sign => run_sign(&mut controller).await,
        Command::Play { text } => {
            let gloss = controller.translator().convert(&text.join(" "));
            println!("{}", format_gloss(&gloss));
            play_gloss(gloss, timing).await;
        }
        Command::Phrases { action } => {
            if let Err(e) = std::fs::create_dir_all(&data_dir) {
                tracing::error!(
                    path = %data_dir.display(),
                    error = %e,
                    "Failed to create data directory"
                );
                return Err(e.into());
            }
            run_phrases(action, &data_dir.join("phrases.json"), &controller)?;
        }
        Command::Demo { json } => run_demo(&mut controller, timing, json).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_expands_home() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        assert_eq!(
            resolve_data_dir("~/.nanban/data"),
            PathBuf::from(home).join(".nanban/data")
        );
        assert_eq!(resolve_data_dir("/var/lib/nanban"), PathBuf::from("/var/lib/nanban"));
    }

    #[test]
    fn test_placeholder_frame_is_not_empty() {
        assert!(!placeholder_frame().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_gloss_returns_after_idle() {
        let start = tokio::time::Instant::now();
        let tokens = vec!["HELLO".to_string(), "FRIEND".to_string()];
        play_gloss(tokens, PlaybackTiming::default()).await;
        assert_eq!(tokio::time::Instant::now() - start, std::time::Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_gloss_empty_returns_immediately() {
        let start = tokio::time::Instant::now();
        play_gloss(Vec::new(), PlaybackTiming::default()).await;
        assert_eq!(tokio::time::Instant::now(), start);
    }
}
