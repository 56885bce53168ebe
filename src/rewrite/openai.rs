//! OpenAI chat-completion rewriter.

use super::{languages, level_description, Rewriter};
use crate::config::{Prompts, RewriteSettings};
use crate::error::{LingoError, Result};
use crate::lesson::CefrLevel;
use crate::openai::create_client_with_timeout;
use async_openai::config::OpenAIConfig;
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

pub struct OpenAIRewriter {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_words: u32,
    prompts: Prompts,
}

impl OpenAIRewriter {
    pub fn new(settings: &RewriteSettings, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_words: settings.max_words,
            prompts: Prompts::default(),
        })
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    fn build_prompt(&self, text: &str, level: CefrLevel, language: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("level".to_string(), level.to_string());
        vars.insert("level_description".to_string(), level_description(level).to_string());
        vars.insert(
            "language_instruction".to_string(),
            languages::instruction_for(language).to_string(),
        );
        vars.insert("max_words".to_string(), self.max_words.to_string());
        vars.insert("text".to_string(), text.to_string());

        self.prompts.render_with_custom(&self.prompts.rewrite.user, &vars)
    }
}

#[async_trait]
impl Rewriter for OpenAIRewriter {
    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn rewrite(&self, text: &str, level: CefrLevel, language: &str) -> Result<String> {
        if !level.is_rewritable() {
            return Err(LingoError::UnsupportedLevel(level.to_string()));
        }

        let prompt = self.build_prompt(text, level, language);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| LingoError::Rewrite(e.to_string()))?
                .into()])
            .temperature(self.temperature)
            .build()
            .map_err(|e| LingoError::Rewrite(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LingoError::OpenAI(format!("Failed to rewrite passage: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| LingoError::Rewrite("Empty response from LLM".to_string()))?
            .trim()
            .to_string();

        debug!("Rewrote {} chars into {} chars", text.len(), answer.len());
        Ok(answer)
    }
}
