//! In-memory document store.
//!
//! Documents are embedded on insert with the configured [`EmbeddingService`] and ranked by
//! cosine similarity at query time. Data is lost on restart.

use std::sync::Arc;

use async_trait::async_trait;
use embedding::EmbeddingService;
use tokio::sync::RwLock;
use tracing::info;

use crate::{Document, DocumentStore};

/// Cosine similarity; 0.0 for empty or zero-norm vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot_product / (norm_a * norm_b)
}

#[derive(Clone)]
pub struct InMemoryDocumentStore {
    entries: Arc<RwLock<Vec<(Document, Vec<f32>)>>>,
    embeddings: Arc<dyn EmbeddingService>,
}

impl InMemoryDocumentStore {
    pub fn new(embeddings: Arc<dyn EmbeddingService>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            embeddings,
        }
    }

    /// Embeds and stores `documents` in one batch.
    pub async fn add_documents(&self, documents: Vec<Document>) -> Result<(), anyhow::Error> {
        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let vectors = self.embeddings.embed_batch(&texts).await?;
        let mut entries = self.entries.write().await;
        entries.extend(documents.into_iter().zip(vectors));
        info!(count = entries.len(), "in-memory document store updated");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>, anyhow::Error> {
        let query_embedding = self.embeddings.embed(query).await?;
        let entries = self.entries.read().await;

        let mut scored: Vec<(f32, &Document)> = entries
            .iter()
            .map(|(doc, vector)| (cosine_similarity(&query_embedding, vector), doc))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let results: Vec<Document> = scored.into_iter().take(k).map(|(_, d)| d.clone()).collect();
        info!(k, count = results.len(), "in-memory similarity search done");
        Ok(results)
    }
}
