//! Construction of the pipeline's collaborators.
//!
//! The orchestrator never builds collaborators itself; it asks a
//! [`ComponentFactory`] on first use. Tests swap in a factory returning mocks.

use crate::chunking::{FixedWindowSegmenter, Segmenter};
use crate::config::{Prompts, Settings};
use crate::embedding::OpenAIEmbedder;
use crate::error::Result;
use crate::openai::require_api_key;
use crate::retrieval::{ContentIndex, EmbeddingIndex};
use crate::rewrite::{OpenAIRewriter, Rewriter};
use crate::transcript_source::{TranscriptSource, YoutubeSource};
use crate::vector_store::MemoryVectorStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The content index and the rewriter that consumes its matches.
#[derive(Clone)]
pub struct RetrievalComponents {
    pub index: Arc<dyn ContentIndex>,
    pub rewriter: Arc<dyn Rewriter>,
}

/// Builds collaborators for an [`Orchestrator`](crate::orchestrator::Orchestrator).
pub trait ComponentFactory: Send + Sync {
    fn build_transcript_source(&self) -> Result<Arc<dyn TranscriptSource>>;

    fn build_segmenter(&self) -> Result<Arc<dyn Segmenter>>;

    fn build_retrieval(&self) -> Result<RetrievalComponents>;
}

/// Factory wiring the YouTube, OpenAI and in-memory implementations from settings.
pub struct DefaultComponents {
    settings: Settings,
}

impl DefaultComponents {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl ComponentFactory for DefaultComponents {
    fn build_transcript_source(&self) -> Result<Arc<dyn TranscriptSource>> {
        debug!("Building YouTube transcript source");
        Ok(Arc::new(YoutubeSource::with_config(&self.settings.youtube)?))
    }

    fn build_segmenter(&self) -> Result<Arc<dyn Segmenter>> {
        Ok(Arc::new(FixedWindowSegmenter::with_max_len(
            self.settings.chunking.max_unit_length,
        )))
    }

    fn build_retrieval(&self) -> Result<RetrievalComponents> {
        require_api_key()?;

        let prompts = Prompts::load(
            self.settings.prompts.custom_dir.as_deref(),
            Some(&self.settings.prompts.variables),
        )?;
        let timeout = Duration::from_secs(self.settings.openai.timeout_secs);

        debug!(
            "Building content index ({}) and rewriter ({})",
            self.settings.embedding.model, self.settings.rewrite.model
        );

        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &self.settings.embedding.model,
            self.settings.embedding.dimensions as usize,
            timeout,
        )?);
        let index = Arc::new(EmbeddingIndex::new(embedder, Arc::new(MemoryVectorStore::new())));
        let rewriter = Arc::new(OpenAIRewriter::new(&self.settings.rewrite, timeout)?.with_prompts(prompts));

        Ok(RetrievalComponents { index, rewriter })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segmenter_uses_configured_length() {
        let mut settings = Settings::default();
        settings.chunking.max_unit_length = 5;
        let segmenter = DefaultComponents::new(settings).build_segmenter().unwrap();

        let units = segmenter.segment("abcdefghijk").unwrap();
        assert_eq!(units.len(), 3);
    }

    #[test]
    fn test_transcript_source_builds_without_network() {
        assert!(DefaultComponents::new(Settings::default())
            .build_transcript_source()
            .is_ok());
    }
}
