//! CLI argument definitions for the Nanban application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nanban_storage::PhraseCategory;

/// Nanban - a two-way sign language conversation assistant.
#[derive(Parser, Debug)]
#[command(name = "nanban", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory holding the phrase store.
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate typed text into gloss tokens.
    Translate {
        /// Text to translate.
        #[arg(required = true)]
        text: Vec<String>,
        /// Play the gloss after translating.
        #[arg(long)]
        play: bool,
    },
    /// Run one speech recognition attempt and translate the result.
    Listen {
        /// Play the gloss after translating.
        #[arg(long)]
        play: bool,
    },
    /// Run one sign recognition attempt on a synthetic frame.
    Sign,
    /// Translate text and play its gloss token by token.
    Play {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Manage saved phrases.
    Phrases {
        #[command(subcommand)]
        action: PhrasesCommand,
    },
    /// Run a short scripted conversation in both directions.
    Demo {
        /// Print the conversation log as JSON at the end.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum PhrasesCommand {
    /// List saved phrases.
    List {
        /// Only phrases in this category.
        #[arg(long)]
        category: Option<PhraseCategory>,
        /// Only phrases whose text or gloss contains this.
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Save a phrase, glossed word by word.
    Add {
        #[arg(required = true)]
        text: Vec<String>,
        #[arg(long, default_value = "Custom")]
        category: PhraseCategory,
    },
    /// Delete a saved phrase.
    Remove { id: String },
    /// Toggle the favorite flag of a saved phrase.
    Favorite { id: String },
    /// Speak a saved phrase.
    Speak { id: String },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > NANBAN_CONFIG env var > platform default (~/.nanban/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("NANBAN_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the data directory path.
    ///
    /// Priority: --data-dir flag > config file value.
    /// Returns `None` if not overridden (use config value).
    pub fn resolve_data_dir(&self) -> Option<String> {
        self.data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".nanban").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".nanban").join("config.toml");
    }
    PathBuf::from("config.toml")
}
