//! CLI module for Tubelingo.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::fmt;

/// Returned by a command that has already printed its failure.
///
/// `main` exits non-zero on it without printing anything else.
#[derive(Debug)]
pub struct AlreadyReported;

impl fmt::Display for AlreadyReported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("command failed")
    }
}

impl std::error::Error for AlreadyReported {}

/// Tubelingo - language lessons from YouTube videos
///
/// Fetches a video's transcript, finds the passages about a topic and
/// rewrites them at a CEFR level.
#[derive(Parser, Debug)]
#[command(name = "tubelingo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a lesson from a video
    Lesson {
        /// YouTube URL or video ID
        url: String,

        /// Transcript language code (e.g. es, de, fr)
        #[arg(short, long)]
        language: String,

        /// Topic to look for in the transcript
        #[arg(short, long)]
        topic: String,

        /// CEFR level (A2, B1, B2)
        #[arg(long)]
        level: Option<String>,

        /// Number of passages to rewrite
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        chunks: Option<i64>,

        /// Print the lesson as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// List the transcript languages of a video
    Languages {
        /// YouTube URL or video ID
        url: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a video's transcript
    Transcript {
        /// YouTube URL or video ID
        url: String,

        /// Preferred transcript language
        #[arg(short, long)]
        language: Option<String>,

        /// Machine-translate the transcript into this language
        #[arg(long, conflicts_with = "language")]
        translate_to: Option<String>,

        /// Output format (text, json, srt, vtt)
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Search YouTube and fetch a transcript for every hit
    Search {
        /// Search query
        query: String,

        /// Maximum number of videos
        #[arg(short = 'k', long, default_value = "5")]
        limit: usize,

        /// Preferred transcript language
        #[arg(short, long)]
        language: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get pronunciation feedback on a recording
    Practice {
        /// Audio file of the learner reading the passage
        audio: String,

        /// The passage the learner was reading
        #[arg(short, long)]
        reference: String,

        /// Language of the recording
        #[arg(short, long, default_value = "en")]
        language: String,

        /// CEFR level of the learner
        #[arg(long)]
        level: Option<String>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
