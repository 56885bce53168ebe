//! Configuration settings for Tubelingo.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub youtube: YoutubeSettings,
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub rewrite: RewriteSettings,
    pub lesson: LessonSettings,
    pub practice: PracticeSettings,
    pub openai: OpenAISettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level used when no -v flag and no RUST_LOG are given.
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// YouTube transcript source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// yt-dlp executable (name on PATH or absolute path).
    pub ytdlp_path: String,
    /// Optional proxy URL used for both yt-dlp and caption downloads.
    pub proxy: Option<String>,
    /// Timeout for caption downloads.
    pub request_timeout_secs: u64,
    /// Language tried when the requested one has no track.
    pub fallback_language: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            ytdlp_path: "yt-dlp".to_string(),
            proxy: None,
            request_timeout_secs: 30,
            fallback_language: "en".to_string(),
        }
    }
}

/// Transcript segmentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum characters per content unit.
    pub max_unit_length: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            max_unit_length: crate::chunking::MAX_UNIT_LENGTH,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// CEFR rewriting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteSettings {
    /// Chat model used for rewriting.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Word limit the model is asked to respect.
    pub max_words: u32,
}

impl Default for RewriteSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.3,
            max_words: 120,
        }
    }
}

/// Defaults for the lesson command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonSettings {
    pub default_level: String,
    pub default_chunks: i64,
}

impl Default for LessonSettings {
    fn default() -> Self {
        Self {
            default_level: "B1".to_string(),
            default_chunks: 3,
        }
    }
}

/// Pronunciation practice settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeSettings {
    /// Speech-to-text model for learner recordings.
    pub transcription_model: String,
    /// Chat model that writes the feedback.
    pub feedback_model: String,
    /// Token cap for the feedback answer.
    pub feedback_max_tokens: u32,
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            transcription_model: "whisper-1".to_string(),
            feedback_model: "gpt-3.5-turbo".to_string(),
            feedback_max_tokens: 100,
        }
    }
}

/// OpenAI client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self { timeout_secs: 300 }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::LingoError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tubelingo")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.max_unit_length, 400);
        assert_eq!(settings.rewrite.max_words, 120);
        assert_eq!(settings.lesson.default_level, "B1");
        assert_eq!(settings.lesson.default_chunks, 3);
        assert_eq!(settings.youtube.fallback_language, "en");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [rewrite]
            model = "gpt-4o-mini"

            [youtube]
            proxy = "http://127.0.0.1:8080"
            "#,
        )
        .unwrap();

        assert_eq!(settings.rewrite.model, "gpt-4o-mini");
        assert_eq!(settings.rewrite.max_words, 120);
        assert_eq!(settings.youtube.proxy.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(settings.youtube.ytdlp_path, "yt-dlp");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.lesson.default_level = "B2".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.lesson.default_level, "B2");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.embedding.dimensions, 1536);
    }
}
