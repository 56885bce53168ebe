//! Caption track catalog and json3 caption parsing.
//!
//! yt-dlp's `--dump-json` output lists manual tracks under `subtitles` and
//! speech-recognition tracks under `automatic_captions`. Automatic entries
//! carrying a `tlang` parameter are machine translations, not source tracks.

use super::{LanguageDescriptor, TranscriptEntry};
use crate::error::{LingoError, Result};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// A single downloadable caption track.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub code: String,
    pub name: String,
    pub is_generated: bool,
    /// Timedtext URL returning json3.
    pub url: String,
}

/// All source caption tracks of one video.
#[derive(Debug, Clone, Default)]
pub struct CaptionCatalog {
    pub video_id: String,
    pub title: String,
    pub manual: Vec<CaptionTrack>,
    pub generated: Vec<CaptionTrack>,
    /// The platform offers machine translation for this video.
    pub translatable: bool,
}

impl CaptionCatalog {
    /// Build a catalog from a yt-dlp info JSON document.
    pub fn from_info_json(info: &Value) -> Result<Self> {
        let video_id = info["id"]
            .as_str()
            .ok_or_else(|| LingoError::CaptionParse("info JSON has no video id".to_string()))?
            .to_string();
        let title = info["title"].as_str().unwrap_or("Unknown Title").to_string();

        let manual = collect_tracks(&info["subtitles"], false)
            .into_iter()
            .filter_map(|(track, _)| track)
            .collect();

        let mut generated: Vec<CaptionTrack> = Vec::new();
        let mut translatable = false;
        for (track, is_translation) in collect_tracks(&info["automatic_captions"], true) {
            if is_translation {
                translatable = true;
                continue;
            }
            if let Some(track) = track {
                if !generated.iter().any(|t| t.code == track.code) {
                    generated.push(track);
                }
            }
        }

        Ok(Self {
            video_id,
            title,
            manual,
            generated,
            translatable,
        })
    }

    /// Language descriptors, manual tracks first.
    pub fn descriptors(&self) -> Vec<LanguageDescriptor> {
        self.tracks()
            .map(|t| LanguageDescriptor::new(&t.name, &t.code, t.is_generated, self.translatable))
            .collect()
    }

    /// Every track, manual before generated.
    pub fn tracks(&self) -> impl Iterator<Item = &CaptionTrack> {
        self.manual.iter().chain(self.generated.iter())
    }

    /// Track for `code`, preferring a manual one.
    pub fn find(&self, code: &str) -> Option<&CaptionTrack> {
        self.manual
            .iter()
            .find(|t| t.code.eq_ignore_ascii_case(code))
            .or_else(|| self.generated.iter().find(|t| t.code.eq_ignore_ascii_case(code)))
    }

    pub fn is_empty(&self) -> bool {
        self.manual.is_empty() && self.generated.is_empty()
    }
}

/// Walk a `{lang: [formats]}` map. Returns each entry's track (if it has a
/// usable URL) and whether it is a machine translation.
fn collect_tracks(map: &Value, is_generated: bool) -> Vec<(Option<CaptionTrack>, bool)> {
    let Some(map) = map.as_object() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for (key, formats) in map {
        // Live chat replays show up as a pseudo-language.
        if key == "live_chat" {
            continue;
        }
        let Some(formats) = formats.as_array() else {
            continue;
        };

        let url = formats
            .iter()
            .find(|f| f["ext"].as_str() == Some("json3"))
            .or_else(|| formats.first())
            .and_then(|f| f["url"].as_str());
        let Some(url) = url else {
            out.push((None, false));
            continue;
        };

        let is_translation = is_generated && has_query_param(url, "tlang");
        let name = formats
            .iter()
            .find_map(|f| f["name"].as_str())
            .unwrap_or(key)
            .to_string();
        let code = key.strip_suffix("-orig").unwrap_or(key).to_string();

        let track = with_query_param(url, "fmt", "json3").map(|url| CaptionTrack {
            code,
            name,
            is_generated,
            url,
        });
        out.push((track, is_translation));
    }
    out
}

fn has_query_param(url: &str, key: &str) -> bool {
    Url::parse(url)
        .map(|u| u.query_pairs().any(|(k, _)| k == key))
        .unwrap_or(false)
}

/// Return `url` with `key` set to `value`, replacing any existing value.
pub fn with_query_param(url: &str, key: &str, value: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    parsed
        .query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(key, value);

    Some(parsed.to_string())
}

#[derive(Debug, Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a json3 caption payload into timed entries.
///
/// Events with no visible text (line-break appends, style events) are dropped.
pub fn parse_json3(body: &str) -> Result<Vec<TranscriptEntry>> {
    let doc: Json3 = serde_json::from_str(body)
        .map_err(|e| LingoError::CaptionParse(format!("Invalid json3 payload: {}", e)))?;

    Ok(doc
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.replace('\n', " ").trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptEntry::new(
                text,
                event.t_start_ms as f64 / 1000.0,
                event.d_duration_ms as f64 / 1000.0,
            ))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_info() -> Value {
        json!({
            "id": "dQw4w9WgXcQ",
            "title": "Sample",
            "subtitles": {
                "en": [
                    {"ext": "srv1", "url": "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=en&fmt=srv1", "name": "English"},
                    {"ext": "json3", "url": "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=en&fmt=json3", "name": "English"}
                ],
                "live_chat": [{"ext": "json", "url": "https://example.com/chat"}]
            },
            "automatic_captions": {
                "de-orig": [
                    {"ext": "json3", "url": "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=de&kind=asr&fmt=json3", "name": "German (Original)"}
                ],
                "de": [
                    {"ext": "json3", "url": "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=de&kind=asr&fmt=json3", "name": "German"}
                ],
                "fr": [
                    {"ext": "json3", "url": "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=de&kind=asr&fmt=json3&tlang=fr", "name": "French"}
                ]
            }
        })
    }

    #[test]
    fn test_catalog_from_info_json() {
        let catalog = CaptionCatalog::from_info_json(&sample_info()).unwrap();

        assert_eq!(catalog.video_id, "dQw4w9WgXcQ");
        assert_eq!(catalog.manual.len(), 1);
        assert_eq!(catalog.manual[0].code, "en");
        assert!(catalog.manual[0].url.contains("fmt=json3"));
        assert_eq!(catalog.generated.len(), 1);
        assert_eq!(catalog.generated[0].code, "de");
        assert!(catalog.translatable);

        let codes: Vec<String> = catalog.descriptors().into_iter().map(|d| d.code).collect();
        assert_eq!(codes, vec!["en", "de"]);
        assert!(catalog.descriptors().iter().all(|d| d.is_translatable));
    }

    #[test]
    fn test_find_prefers_manual() {
        let mut catalog = CaptionCatalog::from_info_json(&sample_info()).unwrap();
        catalog.generated.push(CaptionTrack {
            code: "en".to_string(),
            name: "English (auto)".to_string(),
            is_generated: true,
            url: "https://example.com/en-asr".to_string(),
        });

        assert!(!catalog.find("en").unwrap().is_generated);
        assert!(catalog.find("DE").unwrap().is_generated);
        assert!(catalog.find("es").is_none());
    }

    #[test]
    fn test_catalog_without_captions() {
        let catalog = CaptionCatalog::from_info_json(&json!({"id": "abc", "title": "Silent"})).unwrap();
        assert!(catalog.is_empty());
        assert!(!catalog.translatable);
        assert!(catalog.descriptors().is_empty());
    }

    #[test]
    fn test_with_query_param_replaces() {
        let url = with_query_param("https://example.com/t?lang=en&fmt=srv1", "fmt", "json3").unwrap();
        assert_eq!(url, "https://example.com/t?lang=en&fmt=json3");

        let url = with_query_param("https://example.com/t?lang=en", "tlang", "es").unwrap();
        assert_eq!(url, "https://example.com/t?lang=en&tlang=es");
    }

    #[test]
    fn test_parse_json3() {
        let body = r#"{
            "events": [
                {"tStartMs": 0, "dDurationMs": 2000, "segs": [{"utf8": "Hello"}, {"utf8": " world"}]},
                {"tStartMs": 1500, "aAppend": 1, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 2000, "dDurationMs": 1500, "segs": [{"utf8": "second\nline"}]},
                {"tStartMs": 4000, "dDurationMs": 100}
            ]
        }"#;

        let entries = parse_json3(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], TranscriptEntry::new("Hello world", 0.0, 2.0));
        assert_eq!(entries[1].text, "second line");
        assert_eq!(entries[1].start, 2.0);
    }

    #[test]
    fn test_parse_json3_rejects_garbage() {
        assert!(matches!(parse_json3("<html>"), Err(LingoError::CaptionParse(_))));
    }
}
