//! Lesson request and result types.

use crate::vector_store::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CEFR proficiency tier, A1 lowest to C2 highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

/// Levels the rewriter can target.
pub const REWRITE_LEVELS: [CefrLevel; 3] = [CefrLevel::A2, CefrLevel::B1, CefrLevel::B2];

impl CefrLevel {
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }

    pub fn is_rewritable(&self) -> bool {
        REWRITE_LEVELS.contains(self)
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CefrLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        CefrLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == upper)
            .ok_or_else(|| format!("Unknown CEFR level: {}. Use one of A1, A2, B1, B2, C1, C2.", s))
    }
}

/// Parameters of one `generate_lesson` call.
///
/// Fields are raw caller input; `Orchestrator::generate_lesson` validates them.
#[derive(Debug, Clone)]
pub struct LessonRequest {
    pub url: String,
    pub language: String,
    pub topic: String,
    pub level: String,
    pub n_chunks: i64,
}

impl LessonRequest {
    pub fn new(
        url: impl Into<String>,
        language: impl Into<String>,
        topic: impl Into<String>,
        level: impl Into<String>,
        n_chunks: i64,
    ) -> Self {
        Self {
            url: url.into(),
            language: language.into(),
            topic: topic.into(),
            level: level.into(),
            n_chunks,
        }
    }
}

/// One retrieved passage and its rewrite.
#[derive(Debug, Clone, Serialize)]
pub struct LessonItem {
    pub original: String,
    pub rewritten: String,
    pub metadata: Metadata,
    pub level: CefrLevel,
    /// Whitespace-token count of `rewritten`.
    pub word_count: usize,
}

impl LessonItem {
    pub fn new(original: String, rewritten: String, metadata: Metadata, level: CefrLevel) -> Self {
        let word_count = count_words(&rewritten);
        Self {
            original,
            rewritten,
            metadata,
            level,
            word_count,
        }
    }
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
