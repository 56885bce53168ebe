//! Content index backed by an embedder and a vector store.

use super::{ContentIndex, SearchMatch};
use crate::embedding::Embedder;
use crate::error::{LingoError, Result};
use crate::vector_store::{Document, Metadata, VectorStore};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Embeds texts on insert and queries on search.
pub struct EmbeddingIndex {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl EmbeddingIndex {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }
}

#[async_trait]
impl ContentIndex for EmbeddingIndex {
    #[instrument(skip(self, texts, metadatas), fields(count = texts.len()))]
    async fn add(&self, texts: Vec<String>, metadatas: Option<Vec<Metadata>>) -> Result<()> {
        if texts.is_empty() {
            return Ok(());
        }

        let metadatas = match metadatas {
            Some(m) if m.len() != texts.len() => {
                return Err(LingoError::Index(format!(
                    "Got {} metadata entries for {} texts",
                    m.len(),
                    texts.len()
                )));
            }
            Some(m) => m,
            None => vec![Metadata::new(); texts.len()],
        };

        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| LingoError::Embedding(e.to_string()))?;
        if embeddings.len() != texts.len() {
            return Err(LingoError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        let offset = self.store.document_count().await?;
        let documents: Vec<Document> = texts
            .into_iter()
            .zip(metadatas)
            .zip(embeddings)
            .enumerate()
            .map(|(i, ((text, metadata), embedding))| Document::new(text, metadata, embedding, offset + i))
            .collect();

        let count = self.store.upsert_batch(documents).await?;
        debug!("Indexed {} texts", count);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<SearchMatch>> {
        if self.store.document_count().await? == 0 {
            return Err(LingoError::Index(
                "No content has been added to the index yet".to_string(),
            ));
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        let results = self.store.search(&query_embedding, k).await?;

        Ok(results
            .into_iter()
            .map(|r| SearchMatch {
                text: r.document.content,
                metadata: r.document.metadata,
                score: r.score,
            })
            .collect())
    }

    async fn clear(&self) -> Result<()> {
        self.store.clear().await?;
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        self.store.document_count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::MemoryVectorStore;
    use serde_json::json;

    /// Embeds by counting a few marker words, so similarity is predictable.
    struct KeywordEmbedder;

    const KEYWORDS: [&str; 3] = ["cooking", "football", "music"];

    fn keyword_vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        KEYWORDS
            .iter()
            .map(|k| lower.matches(k).count() as f32)
            .collect()
    }

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(keyword_vector(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| keyword_vector(t)).collect())
        }

        fn dimensions(&self) -> usize {
            KEYWORDS.len()
        }
    }

    fn index() -> EmbeddingIndex {
        EmbeddingIndex::new(Arc::new(KeywordEmbedder), Arc::new(MemoryVectorStore::new()))
    }

    #[tokio::test]
    async fn test_add_and_search() {
        let index = index();
        let mut meta = Metadata::new();
        meta.insert("unit_index".to_string(), json!(1));

        index
            .add(
                vec!["We talk about football today".to_string(), "Cooking pasta and cooking rice".to_string()],
                Some(vec![Metadata::new(), meta]),
            )
            .await
            .unwrap();

        assert_eq!(index.len().await.unwrap(), 2);

        let matches = index.similarity_search("en cooking", 1).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].text.starts_with("Cooking"));
        assert_eq!(matches[0].metadata["unit_index"], json!(1));
    }

    #[tokio::test]
    async fn test_k_larger_than_index() {
        let index = index();
        index.add(vec!["music".to_string()], None).await.unwrap();
        let matches = index.similarity_search("music", 3).await.unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[tokio::test]
    async fn test_search_on_empty_index_fails() {
        let err = index().similarity_search("anything", 3).await.unwrap_err();
        assert!(matches!(err, LingoError::Index(_)));
    }

    #[tokio::test]
    async fn test_metadata_length_mismatch() {
        let err = index()
            .add(vec!["a".to_string(), "b".to_string()], Some(vec![Metadata::new()]))
            .await
            .unwrap_err();
        assert!(matches!(err, LingoError::Index(_)));
    }

    #[tokio::test]
    async fn test_clear() {
        let index = index();
        index.add(vec!["music".to_string()], None).await.unwrap();
        index.clear().await.unwrap();
        assert_eq!(index.len().await.unwrap(), 0);
    }
}
