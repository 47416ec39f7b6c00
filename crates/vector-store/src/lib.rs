//! # Document Store
//!
//! Similarity search over a pre-embedded document collection.
//!
//! - [`PgVectorStore`]: PostgreSQL + pgvector, reading the collection/embedding tables the
//!   LangChain `PGVector` loader writes (`langchain_pg_collection`, `langchain_pg_embedding`).
//! - [`InMemoryDocumentStore`]: cosine similarity over vectors held in memory; for tests and
//!   local development.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod inmemory;
mod pgvector;

pub use inmemory::{cosine_similarity, InMemoryDocumentStore};
pub use pgvector::{normalize_database_url, vector_literal, PgVectorStore};

/// A stored document: text plus free-form JSON metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Similarity search over an embedded collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns up to `k` documents closest to `query`, nearest first.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>, anyhow::Error>;
}
