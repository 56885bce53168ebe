//! YouTube transcript source backed by yt-dlp.

use super::captions::{parse_json3, with_query_param, CaptionCatalog, CaptionTrack};
use super::{LanguageDescriptor, Transcript, TranscriptSource, VideoSummary};
use crate::config::YoutubeSettings;
use crate::error::{LingoError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

const SUPPORTED_HOSTS: &[&str] = &["www.youtube.com", "youtube.com", "m.youtube.com", "youtu.be"];

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Matches the common YouTube URL shapes and bare video IDs
        Regex::new(
            r"(?x)
            (?:
                (?:https?://)?
                (?:www\.|m\.)?
                (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex")
    })
}

/// Extract the video ID from a YouTube URL or bare ID.
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();

    if let Some(caps) = video_id_regex().captures(input) {
        if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            return Ok(m.as_str().to_string());
        }
    }

    // Fall back to URL parsing for query strings like watch?feature=share&v=ID
    let parsed = Url::parse(input)
        .map_err(|_| LingoError::InvalidInput(format!("Could not extract video ID from URL: {}", input)))?;
    let host = parsed.host_str().unwrap_or_default();
    if !SUPPORTED_HOSTS.contains(&host) {
        return Err(LingoError::InvalidInput(format!("Unsupported domain: {}", host)));
    }

    let id = if host == "youtu.be" {
        parsed.path().trim_start_matches('/').to_string()
    } else {
        parsed
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())
            .ok_or_else(|| LingoError::InvalidInput("Missing video ID in YouTube URL".to_string()))?
    };

    if id.is_empty() {
        return Err(LingoError::InvalidInput(format!("Could not extract video ID from URL: {}", input)));
    }
    Ok(id)
}

fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// YouTube transcript source.
pub struct YoutubeSource {
    ytdlp: String,
    proxy: Option<String>,
    fallback_language: String,
    http: reqwest::Client,
}

impl YoutubeSource {
    /// Create a source with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(&YoutubeSettings::default())
    }

    /// Create a source from settings.
    pub fn with_config(settings: &YoutubeSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36");

        if let Some(proxy) = &settings.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| LingoError::Config(format!("Invalid proxy '{}': {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| LingoError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            ytdlp: settings.ytdlp_path.clone(),
            proxy: settings.proxy.clone(),
            fallback_language: settings.fallback_language.clone(),
            http,
        })
    }

    /// Run yt-dlp with the given arguments and return stdout.
    async fn run_ytdlp(&self, args: &[&str]) -> Result<String> {
        let mut command = tokio::process::Command::new(&self.ytdlp);
        command.arg("--no-warnings");
        if let Some(proxy) = &self.proxy {
            command.arg("--proxy").arg(proxy);
        }
        command.args(args);

        let output = command.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LingoError::ToolNotFound(self.ytdlp.clone())
            } else {
                LingoError::ToolFailed(format!("Failed to run yt-dlp: {}", e))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LingoError::ToolFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Fetch the caption catalog for a video.
    #[instrument(skip(self))]
    pub async fn catalog(&self, url: &str) -> Result<CaptionCatalog> {
        let video_id = extract_video_id(url)?;
        let stdout = self
            .run_ytdlp(&["--dump-json", "--skip-download", "--no-playlist", &watch_url(&video_id)])
            .await
            .map_err(|e| match e {
                LingoError::ToolFailed(msg) => {
                    LingoError::VideoNotFound(format!("Video {} not found or unavailable: {}", video_id, msg))
                }
                other => other,
            })?;

        let info: serde_json::Value = serde_json::from_str(stdout.trim()).map_err(|e| {
            LingoError::VideoSource(format!("Failed to parse yt-dlp output: {}", e))
        })?;

        let catalog = CaptionCatalog::from_info_json(&info)?;
        debug!(
            "{} manual and {} generated caption tracks for {}",
            catalog.manual.len(),
            catalog.generated.len(),
            video_id
        );
        Ok(catalog)
    }

    async fn fetch_track(&self, video_id: &str, track_url: &str, language_code: &str) -> Result<Transcript> {
        let response = self.http.get(track_url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let entries = parse_json3(&body)?;

        if entries.is_empty() {
            return Err(LingoError::NoTranscript(format!(
                "Caption track '{}' for video {} is empty",
                language_code, video_id
            )));
        }

        Ok(Transcript::new(video_id.to_string(), language_code.to_string(), entries))
    }

    /// Pick the track for `language`, falling back to the configured
    /// language and then to the first track.
    fn choose_track<'a>(&self, catalog: &'a CaptionCatalog, language: Option<&str>) -> Option<&'a CaptionTrack> {
        if let Some(lang) = language {
            if let Some(track) = catalog.find(lang) {
                return Some(track);
            }
            warn!("No '{}' transcript for {}, falling back", lang, catalog.video_id);
        }
        catalog
            .find(&self.fallback_language)
            .or_else(|| catalog.tracks().next())
    }
}

#[async_trait]
impl TranscriptSource for YoutubeSource {
    async fn available_languages(&self, url: &str) -> Result<Vec<LanguageDescriptor>> {
        Ok(self.catalog(url).await?.descriptors())
    }

    #[instrument(skip(self))]
    async fn transcribe(&self, url: &str, language: Option<&str>) -> Result<Transcript> {
        let catalog = self.catalog(url).await?;
        let track = self.choose_track(&catalog, language).ok_or_else(|| {
            LingoError::NoTranscript(format!("Video {} has no transcripts", catalog.video_id))
        })?;

        info!("Fetching '{}' transcript for {}", track.code, catalog.video_id);
        self.fetch_track(&catalog.video_id, &track.url, &track.code).await
    }

    #[instrument(skip(self))]
    async fn transcribe_with_translation(&self, url: &str, target_language: &str) -> Result<Transcript> {
        let catalog = self.catalog(url).await?;
        if !catalog.translatable {
            return Err(LingoError::NoTranscript(format!(
                "Video {} does not offer translated transcripts",
                catalog.video_id
            )));
        }

        let base = catalog
            .find("en")
            .or_else(|| catalog.tracks().next())
            .ok_or_else(|| {
                LingoError::NoTranscript(format!("Video {} has no transcripts", catalog.video_id))
            })?;

        let translated_url = with_query_param(&base.url, "tlang", target_language).ok_or_else(|| {
            LingoError::CaptionParse(format!("Invalid caption URL for track '{}'", base.code))
        })?;

        info!(
            "Fetching '{}' transcript translated to '{}' for {}",
            base.code, target_language, catalog.video_id
        );
        self.fetch_track(&catalog.video_id, &translated_url, target_language).await
    }

    #[instrument(skip(self))]
    async fn search_videos(&self, query: &str, limit: usize) -> Result<Vec<VideoSummary>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let search = format!("ytsearch{}:{}", limit, query);
        let stdout = self
            .run_ytdlp(&["--dump-json", "--flat-playlist", &search])
            .await
            .map_err(|e| match e {
                LingoError::ToolFailed(msg) => {
                    LingoError::VideoSource(format!("Failed to search YouTube: {}", msg))
                }
                other => other,
            })?;

        let videos: Vec<VideoSummary> = stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
            .filter_map(|json| parse_search_entry(&json))
            .take(limit)
            .collect();

        debug!("Search returned {} videos", videos.len());
        Ok(videos)
    }
}

fn parse_search_entry(json: &serde_json::Value) -> Option<VideoSummary> {
    let video_id = json["id"]
        .as_str()
        .map(|s| s.to_string())
        .or_else(|| json["url"].as_str().and_then(|u| extract_video_id(u).ok()))?;

    let published_at = json["upload_date"].as_str().and_then(|date_str| {
        // yt-dlp returns date as YYYYMMDD
        chrono::NaiveDate::parse_from_str(date_str, "%Y%m%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    });

    Some(VideoSummary {
        url: watch_url(&video_id),
        title: json["title"].as_str().unwrap_or("Unknown Title").to_string(),
        duration_seconds: json["duration"].as_f64().map(|d| d as u32),
        channel: json["channel"]
            .as_str()
            .or_else(|| json["uploader"].as_str())
            .map(|s| s.to_string()),
        published_at,
        video_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript_source::CaptionTrack;
    use serde_json::json;

    #[test]
    fn test_extract_video_id() {
        for input in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtube.com/embed/dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "  dQw4w9WgXcQ  ",
        ] {
            assert_eq!(extract_video_id(input).unwrap(), "dQw4w9WgXcQ", "input {}", input);
        }
    }

    #[test]
    fn test_extract_video_id_rejects() {
        assert!(extract_video_id("").is_err());
        assert!(extract_video_id("not-a-video-id").is_err());
        assert!(extract_video_id("https://vimeo.com/watch?v=dQw4w9WgXcQ").is_err());
        assert!(extract_video_id("https://www.youtube.com/feed/trending").is_err());
    }

    #[test]
    fn test_choose_track_fallbacks() {
        let source = YoutubeSource::new().unwrap();
        let track = |code: &str, generated: bool| CaptionTrack {
            code: code.to_string(),
            name: code.to_string(),
            is_generated: generated,
            url: format!("https://example.com/{}", code),
        };

        let catalog = CaptionCatalog {
            video_id: "vid".to_string(),
            title: "t".to_string(),
            manual: vec![track("fr", false)],
            generated: vec![track("en", true)],
            translatable: true,
        };

        assert_eq!(source.choose_track(&catalog, Some("fr")).unwrap().code, "fr");
        assert_eq!(source.choose_track(&catalog, Some("ja")).unwrap().code, "en");
        assert_eq!(source.choose_track(&catalog, None).unwrap().code, "en");

        let no_english = CaptionCatalog {
            generated: Vec::new(),
            ..catalog
        };
        assert_eq!(source.choose_track(&no_english, Some("ja")).unwrap().code, "fr");

        let empty = CaptionCatalog::default();
        assert!(source.choose_track(&empty, Some("en")).is_none());
    }

    #[test]
    fn test_parse_search_entry() {
        let entry = parse_search_entry(&json!({
            "id": "jNQXAC9IVRw",
            "title": "Me at the zoo",
            "duration": 19.0,
            "uploader": "jawed",
            "upload_date": "20050424"
        }))
        .unwrap();

        assert_eq!(entry.url, "https://www.youtube.com/watch?v=jNQXAC9IVRw");
        assert_eq!(entry.duration_seconds, Some(19));
        assert_eq!(entry.channel.as_deref(), Some("jawed"));
        assert_eq!(entry.published_at.unwrap().format("%Y-%m-%d").to_string(), "2005-04-24");

        assert!(parse_search_entry(&json!({"title": "no id"})).is_none());
    }

    #[tokio::test]
    async fn test_missing_ytdlp_is_tool_not_found() {
        let settings = YoutubeSettings {
            ytdlp_path: "definitely-not-a-real-ytdlp-binary".to_string(),
            ..YoutubeSettings::default()
        };
        let source = YoutubeSource::with_config(&settings).unwrap();

        let err = source.available_languages("dQw4w9WgXcQ").await.unwrap_err();
        assert!(matches!(err, LingoError::ToolNotFound(_)));
    }
}
