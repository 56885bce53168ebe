//! Transcript segmentation into bounded-length content units.

mod fixed;

pub use fixed::{segment, FixedWindowSegmenter};

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Maximum number of characters in a content unit.
pub const MAX_UNIT_LENGTH: usize = 400;

/// A bounded run of transcript text.
///
/// Units carry no identity beyond their content; their position in the
/// sequence produced by a segmenter matches their position in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentUnit {
    content: String,
}

impl ContentUnit {
    pub(crate) fn new(content: String) -> Self {
        Self { content }
    }

    /// The unit's text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

impl AsRef<str> for ContentUnit {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

/// Splits text into content units.
pub trait Segmenter: Send + Sync {
    /// Split `text` into ordered, non-overlapping units.
    fn segment(&self, text: &str) -> Result<Vec<ContentUnit>>;
}
