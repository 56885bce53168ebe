//! In-memory vector store implementation.

use super::{cosine_similarity, Document, SearchResult, VectorStore};
use crate::error::{LingoError, Result};
use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory vector store.
pub struct MemoryVectorStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Document>>> {
        self.documents
            .read()
            .map_err(|_| LingoError::Index("vector store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Document>>> {
        self.documents
            .write()
            .map_err(|_| LingoError::Index("vector store lock poisoned".to_string()))
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, docs: Vec<Document>) -> Result<usize> {
        let mut store = self.write()?;
        let count = docs.len();
        for doc in docs {
            match store.iter_mut().find(|d| d.id == doc.id) {
                Some(existing) => *existing = doc,
                None => store.push(doc),
            }
        }
        Ok(count)
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let docs = self.read()?;

        let mut results: Vec<SearchResult> = docs
            .iter()
            .map(|doc| SearchResult {
                score: cosine_similarity(query_embedding, &doc.embedding),
                document: doc.clone(),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        Ok(results)
    }

    async fn clear(&self) -> Result<usize> {
        let mut docs = self.write()?;
        let removed = docs.len();
        docs.clear();
        Ok(removed)
    }

    async fn document_count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::Metadata;

    fn doc(content: &str, embedding: Vec<f32>, position: usize) -> Document {
        Document::new(content.to_string(), Metadata::new(), embedding, position)
    }

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new();

        store
            .upsert_batch(vec![
                doc("Hello world", vec![1.0, 0.0, 0.0], 0),
                doc("Goodbye world", vec![0.0, 1.0, 0.0], 1),
            ])
            .await
            .unwrap();

        assert_eq!(store.document_count().await.unwrap(), 2);

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.content, "Hello world");
        assert!(results[0].score > results[1].score);

        let top = store.search(&[0.0, 1.0, 0.0], 1).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].document.content, "Goodbye world");
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let store = MemoryVectorStore::new();
        store
            .upsert_batch(vec![
                doc("first", vec![1.0, 1.0], 0),
                doc("second", vec![1.0, 1.0], 1),
                doc("third", vec![1.0, 1.0], 2),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 1.0], 3).await.unwrap();
        let contents: Vec<&str> = results.iter().map(|r| r.document.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_id_and_clear() {
        let store = MemoryVectorStore::new();
        let original = doc("v1", vec![1.0], 0);
        let mut replacement = original.clone();
        replacement.content = "v2".to_string();

        store.upsert_batch(vec![original]).await.unwrap();
        store.upsert_batch(vec![replacement]).await.unwrap();
        assert_eq!(store.document_count().await.unwrap(), 1);

        assert_eq!(store.clear().await.unwrap(), 1);
        assert_eq!(store.document_count().await.unwrap(), 0);
        assert!(store.search(&[1.0], 5).await.unwrap().is_empty());
    }
}
