//! Transcript source abstraction for Tubelingo.
//!
//! A transcript source lists which caption languages a video offers, fetches
//! a transcript (optionally machine-translated) and can search for videos.

mod captions;
mod format;
mod youtube;

pub use captions::{CaptionCatalog, CaptionTrack};
pub use format::{format_transcript, OutputFormat};
pub use youtube::{extract_video_id, YoutubeSource};

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A transcript language offered for a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDescriptor {
    /// Human-readable name as reported by the platform.
    pub name: String,
    /// Language code (ISO 639-1 / BCP-47 primary tag).
    pub code: String,
    /// Whether the track was produced by speech recognition.
    pub is_generated: bool,
    /// Whether the platform can machine-translate this track.
    pub is_translatable: bool,
}

impl LanguageDescriptor {
    pub fn new(name: &str, code: &str, is_generated: bool, is_translatable: bool) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
            is_generated,
            is_translatable,
        }
    }
}

/// One timed caption line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl TranscriptEntry {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A fetched transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    /// Language of the returned text (the translation target when translated).
    pub language_code: String,
    pub entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new(video_id: String, language_code: String, entries: Vec<TranscriptEntry>) -> Self {
        Self {
            video_id,
            language_code,
            entries,
        }
    }

    /// Plain-text rendering: one caption line per row.
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.text.trim().is_empty())
    }

    pub fn duration_seconds(&self) -> f64 {
        self.entries.last().map(|e| e.end()).unwrap_or(0.0)
    }
}

/// A video found by a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub url: String,
    pub duration_seconds: Option<u32>,
    pub channel: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Outcome of transcribing one search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchTranscription {
    pub video: VideoSummary,
    pub transcript: Option<String>,
    pub error: Option<String>,
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List the transcript languages available for a video.
    async fn available_languages(&self, url: &str) -> Result<Vec<LanguageDescriptor>>;

    /// Fetch a transcript, preferring `language` when given.
    async fn transcribe(&self, url: &str, language: Option<&str>) -> Result<Transcript>;

    /// Fetch a transcript machine-translated into `target_language`.
    async fn transcribe_with_translation(&self, url: &str, target_language: &str) -> Result<Transcript>;

    /// Search for videos matching `query`, returning at most `limit` hits.
    async fn search_videos(&self, query: &str, limit: usize) -> Result<Vec<VideoSummary>>;
}

/// Search for videos and transcribe each hit.
///
/// A failed transcription is recorded on its hit instead of aborting the batch.
pub async fn search_and_transcribe(
    source: &dyn TranscriptSource,
    query: &str,
    limit: usize,
    language: Option<&str>,
) -> Result<Vec<SearchTranscription>> {
    let videos = source.search_videos(query, limit).await?;
    let mut results = Vec::with_capacity(videos.len());

    for video in videos {
        match source.transcribe(&video.url, language).await {
            Ok(transcript) => results.push(SearchTranscription {
                video,
                transcript: Some(transcript.to_text()),
                error: None,
            }),
            Err(e) => {
                warn!("Could not transcribe {}: {}", video.video_id, e);
                results.push(SearchTranscription {
                    video,
                    transcript: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LingoError;

    struct FakeSource;

    #[async_trait]
    impl TranscriptSource for FakeSource {
        async fn available_languages(&self, _url: &str) -> Result<Vec<LanguageDescriptor>> {
            Ok(Vec::new())
        }

        async fn transcribe(&self, url: &str, _language: Option<&str>) -> Result<Transcript> {
            if url.ends_with("bbbbbbbbbbb") {
                return Err(LingoError::NoTranscript("captions disabled".to_string()));
            }
            Ok(Transcript::new(
                "aaaaaaaaaaa".to_string(),
                "en".to_string(),
                vec![TranscriptEntry::new("Hello", 0.0, 1.0), TranscriptEntry::new("there", 1.0, 1.5)],
            ))
        }

        async fn transcribe_with_translation(&self, url: &str, _target: &str) -> Result<Transcript> {
            self.transcribe(url, None).await
        }

        async fn search_videos(&self, _query: &str, limit: usize) -> Result<Vec<VideoSummary>> {
            Ok(["aaaaaaaaaaa", "bbbbbbbbbbb"]
                .iter()
                .take(limit)
                .map(|id| VideoSummary {
                    video_id: id.to_string(),
                    title: format!("Video {}", id),
                    url: format!("https://www.youtube.com/watch?v={}", id),
                    duration_seconds: None,
                    channel: None,
                    published_at: None,
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_search_and_transcribe_records_failures() {
        let results = search_and_transcribe(&FakeSource, "cooking", 5, Some("en"))
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].transcript.as_deref(), Some("Hello\nthere"));
        assert!(results[0].error.is_none());
        assert!(results[1].transcript.is_none());
        assert!(results[1].error.as_deref().unwrap().contains("captions disabled"));
    }

    #[test]
    fn test_transcript_text_and_duration() {
        let transcript = Transcript::new(
            "id".to_string(),
            "en".to_string(),
            vec![TranscriptEntry::new("One", 0.0, 2.0), TranscriptEntry::new("Two", 2.0, 3.5)],
        );
        assert_eq!(transcript.to_text(), "One\nTwo");
        assert_eq!(transcript.duration_seconds(), 5.5);
        assert!(!transcript.is_empty());

        let blank = Transcript::new("id".to_string(), "en".to_string(), vec![TranscriptEntry::new("  ", 0.0, 1.0)]);
        assert!(blank.is_empty());
    }
}
