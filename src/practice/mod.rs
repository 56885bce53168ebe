//! Pronunciation practice: transcribe a learner's recording and coach them.

use crate::config::{PracticeSettings, Prompts};
use crate::error::{LingoError, Result};
use crate::lesson::CefrLevel;
use crate::openai::create_client_with_timeout;
use crate::rewrite::display_name;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    AudioInput, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    CreateTranscriptionRequestArgs,
};
use async_openai::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Feedback used when the coaching call fails.
pub const FALLBACK_FEEDBACK: &str = "Good effort! Keep practicing to improve your pronunciation.";

/// Characters of the reference passage shown to the coach.
const REFERENCE_EXCERPT_CHARS: usize = 150;

/// Outcome of one practice attempt.
#[derive(Debug, Clone, Serialize)]
pub struct PracticeResult {
    pub transcribed: String,
    pub feedback: String,
}

/// Whisper transcription plus chat-model feedback.
pub struct PracticeCoach {
    client: Client<OpenAIConfig>,
    transcription_model: String,
    feedback_model: String,
    feedback_max_tokens: u32,
    prompts: Prompts,
}

impl PracticeCoach {
    pub fn new(settings: &PracticeSettings, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
            transcription_model: settings.transcription_model.clone(),
            feedback_model: settings.feedback_model.clone(),
            feedback_max_tokens: settings.feedback_max_tokens,
            prompts: Prompts::default(),
        })
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Transcribe `audio_path` and comment on it against `reference`.
    #[instrument(skip(self, reference), fields(audio_path = %audio_path.display()))]
    pub async fn practice(
        &self,
        audio_path: &Path,
        reference: &str,
        language: &str,
        level: CefrLevel,
    ) -> Result<PracticeResult> {
        let transcribed = self.transcribe(audio_path, language).await?;
        let feedback = self.feedback(reference, &transcribed, level, language).await;
        Ok(PracticeResult { transcribed, feedback })
    }

    /// Speech-to-text with a language hint.
    pub async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<String> {
        let file_bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("recording.wav")
            .to_string();

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(AudioInput::from_vec_u8(file_name, file_bytes))
            .model(&self.transcription_model);
        if !language.trim().is_empty() {
            request_builder.language(language);
        }

        let request = request_builder
            .build()
            .map_err(|e| LingoError::Practice(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| LingoError::OpenAI(format!("Whisper API error: {}", e)))?;

        let text = response.text.trim().to_string();
        debug!("Transcribed recording: {} chars", text.len());
        Ok(text)
    }

    /// Coaching feedback; falls back to [`FALLBACK_FEEDBACK`] on any failure.
    pub async fn feedback(&self, reference: &str, transcribed: &str, level: CefrLevel, language: &str) -> String {
        match self.request_feedback(reference, transcribed, level, language).await {
            Ok(feedback) => feedback,
            Err(e) => {
                warn!("Feedback generation failed: {}", e);
                FALLBACK_FEEDBACK.to_string()
            }
        }
    }

    async fn request_feedback(
        &self,
        reference: &str,
        transcribed: &str,
        level: CefrLevel,
        language: &str,
    ) -> Result<String> {
        let prompt = self.build_prompt(reference, transcribed, level, language);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.feedback_model)
            .messages(vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| LingoError::Practice(e.to_string()))?
                .into()])
            .max_tokens(self.feedback_max_tokens)
            .build()
            .map_err(|e| LingoError::Practice(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LingoError::OpenAI(format!("Failed to generate feedback: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| LingoError::Practice("Empty response from LLM".to_string()))
    }

    fn build_prompt(&self, reference: &str, transcribed: &str, level: CefrLevel, language: &str) -> String {
        let excerpt: String = reference.chars().take(REFERENCE_EXCERPT_CHARS).collect();

        let mut vars = HashMap::new();
        vars.insert("language_name".to_string(), display_name(language));
        vars.insert("original".to_string(), excerpt);
        vars.insert("transcribed".to_string(), transcribed.to_string());
        vars.insert("level".to_string(), level.to_string());

        self.prompts.render_with_custom(&self.prompts.feedback.user, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coach() -> PracticeCoach {
        PracticeCoach::new(&PracticeSettings::default(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_prompt_truncates_reference() {
        let reference = "x".repeat(400);
        let prompt = coach().build_prompt(&reference, "hola", CefrLevel::B1, "es");

        assert!(prompt.contains(&format!("Original: \"{}\"", "x".repeat(150))));
        assert!(!prompt.contains(&"x".repeat(151)));
        assert!(prompt.contains("Student said: \"hola\""));
        assert!(prompt.contains("language coach for Spanish"));
        assert!(prompt.contains("Level: B1"));
    }

    #[test]
    fn test_prompt_truncates_on_char_boundary() {
        let reference = "ü".repeat(200);
        let prompt = coach().build_prompt(&reference, "", CefrLevel::A2, "de");
        assert!(prompt.contains(&"ü".repeat(150)));
        assert!(!prompt.contains(&"ü".repeat(151)));
    }

    #[tokio::test]
    async fn test_missing_recording_is_an_error() {
        let err = coach()
            .practice(Path::new("/nonexistent/recording.wav"), "text", "en", CefrLevel::B1)
            .await
            .unwrap_err();
        assert!(matches!(err, LingoError::Io(_)));
    }
}
