//! Prompt templates for Tubelingo.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub rewrite: RewritePrompts,
    pub feedback: FeedbackPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt for rewriting a transcript passage at a CEFR level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewritePrompts {
    pub user: String,
}

impl Default for RewritePrompts {
    fn default() -> Self {
        Self {
            user: r#"Rewrite the following text for a {{level}} language learner ({{level_description}}).

{{language_instruction}}

Requirements:
- Target level: {{level}}
- Maximum length: {{max_words}} words
- Keep the original meaning
- Use natural, conversational language
- Make it engaging and easy to understand

Original text:
{{text}}

Rewritten text:"#
                .to_string(),
        }
    }
}

/// Prompt for pronunciation feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackPrompts {
    pub user: String,
}

impl Default for FeedbackPrompts {
    fn default() -> Self {
        Self {
            user: r#"As a language coach for {{language_name}}, compare what the student said to the original text.
Be encouraging and specific. Consider the pronunciation challenges specific to {{language_name}}.

Original: "{{original}}"
Student said: "{{transcribed}}"
Level: {{level}}

In 2-3 sentences, mention what they did well and one area to improve."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let rewrite_path = custom_path.join("rewrite.toml");
            if rewrite_path.exists() {
                let content = std::fs::read_to_string(&rewrite_path)?;
                prompts.rewrite = toml::from_str(&content)?;
            }

            let feedback_path = custom_path.join("feedback.toml");
            if feedback_path.exists() {
                let content = std::fs::read_to_string(&feedback_path)?;
                prompts.feedback = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
