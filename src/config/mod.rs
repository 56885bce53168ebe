//! Configuration module for Tubelingo.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{FeedbackPrompts, Prompts, RewritePrompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, LessonSettings, OpenAISettings,
    PracticeSettings, PromptSettings, RewriteSettings, Settings, YoutubeSettings,
};
