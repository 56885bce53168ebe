//! Level-constrained rewriting of transcript passages.

mod languages;
mod openai;

pub use languages::{display_name, instruction_for};
pub use openai::OpenAIRewriter;

use crate::error::Result;
use crate::lesson::CefrLevel;
use async_trait::async_trait;

/// Trait for rewriter implementations.
///
/// Implementations accept the levels in [`REWRITE_LEVELS`](crate::lesson::REWRITE_LEVELS),
/// the same set lesson requests are validated against, and reject any other
/// level with `LingoError::UnsupportedLevel`.
#[async_trait]
pub trait Rewriter: Send + Sync {
    /// Rewrite `text` for a learner at `level`, answering in `language`.
    async fn rewrite(&self, text: &str, level: CefrLevel, language: &str) -> Result<String>;
}

/// Short description of a level used in prompts.
pub fn level_description(level: CefrLevel) -> &'static str {
    match level {
        CefrLevel::A1 => "beginner level with very basic words and phrases",
        CefrLevel::A2 => "elementary level with simple vocabulary and short sentences",
        CefrLevel::B1 => "intermediate level with everyday vocabulary and clear structure",
        CefrLevel::B2 => "upper-intermediate level with varied vocabulary and complex sentences",
        CefrLevel::C1 => "advanced level with rich vocabulary and nuanced structure",
        CefrLevel::C2 => "proficient level with near-native vocabulary and style",
    }
}
