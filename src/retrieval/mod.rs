//! Similarity-searchable content index.
//!
//! Texts go in as a batch with optional metadata; queries come back as the
//! top-k matches, best first.

mod index;

pub use index::EmbeddingIndex;

use crate::error::Result;
use crate::vector_store::Metadata;
use async_trait::async_trait;
use serde::Serialize;

/// One similarity-search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    pub text: String,
    pub metadata: Metadata,
    pub score: f32,
}

/// Trait for content index implementations.
#[async_trait]
pub trait ContentIndex: Send + Sync {
    /// Add texts, with one metadata map per text when given.
    async fn add(&self, texts: Vec<String>, metadatas: Option<Vec<Metadata>>) -> Result<()>;

    /// Return up to `k` matches for `query`, best first.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<SearchMatch>>;

    /// Drop all indexed content.
    async fn clear(&self) -> Result<()>;

    /// Number of indexed texts.
    async fn len(&self) -> Result<usize>;
}
