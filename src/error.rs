//! Error types for Tubelingo.
//!
//! `LingoError` covers failures raised by collaborators (yt-dlp, HTTP,
//! OpenAI, the index). `PipelineError` is what `Orchestrator::generate_lesson`
//! returns: every collaborator failure is folded into exactly one of its kinds.

use crate::transcript_source::LanguageDescriptor;
use thiserror::Error;

/// Library-level error type for collaborator operations.
#[derive(Error, Debug)]
pub enum LingoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Video source error: {0}")]
    VideoSource(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("No transcript available: {0}")]
    NoTranscript(String),

    #[error("Caption parse error: {0}")]
    CaptionParse(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Content index error: {0}")]
    Index(String),

    #[error("Rewrite failed: {0}")]
    Rewrite(String),

    #[error("CEFR level {0} is not supported for rewriting")]
    UnsupportedLevel(String),

    #[error("Practice error: {0}")]
    Practice(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for collaborator operations.
pub type Result<T> = std::result::Result<T, LingoError>;

/// Failure of a lesson generation run.
///
/// Each variant corresponds to the stage that failed, so callers can pick a
/// remediation (re-prompt, retry, abort) by matching on the kind.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Bad input parameters. Never retryable.
    #[error("Invalid {field} '{value}': {reason}")]
    Validation {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The requested transcript language does not exist for the video.
    #[error(
        "The requested language '{language}' is not available for this video. Available languages: {}",
        describe_languages(.available)
    )]
    LanguageNotAvailable {
        language: String,
        available: Vec<LanguageDescriptor>,
    },

    /// The transcript stage failed or produced nothing.
    #[error("Transcript fetch failed: {0}")]
    TranscriptFetch(String),

    /// Segmentation produced nothing.
    #[error("Chunking failed: {0}")]
    Chunking(String),

    /// Indexing, search or rewriting failed.
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// Collaborator construction failure or any uncategorized fault.
    #[error("Pipeline error: {0}")]
    General(String),
}

impl PipelineError {
    pub(crate) fn validation(field: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::Validation {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation { .. } => "validation",
            PipelineError::LanguageNotAvailable { .. } => "language_not_available",
            PipelineError::TranscriptFetch(_) => "transcript_fetch",
            PipelineError::Chunking(_) => "chunking",
            PipelineError::Retrieval(_) => "retrieval",
            PipelineError::General(_) => "pipeline",
        }
    }

    /// Whether repeating the same call unchanged may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PipelineError::TranscriptFetch(_) | PipelineError::Retrieval(_)
        )
    }

    /// Languages the caller can offer instead, if this is a language error.
    pub fn available_languages(&self) -> Option<&[LanguageDescriptor]> {
        match self {
            PipelineError::LanguageNotAvailable { available, .. } => Some(available.as_slice()),
            _ => None,
        }
    }
}

fn describe_languages(languages: &[LanguageDescriptor]) -> String {
    if languages.is_empty() {
        return "none".to_string();
    }
    languages
        .iter()
        .map(|l| format!("{} ({})", l.name, l.code))
        .collect::<Vec<_>>()
        .join(", ")
}
