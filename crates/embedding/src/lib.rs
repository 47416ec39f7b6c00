//! # Text Embeddings
//!
//! The [`EmbeddingService`] interface and its OpenAI implementation. Queries to the customer
//! document store are embedded with the same model that embedded the collection.

use async_trait::async_trait;

mod config;
pub mod openai;

pub use config::EmbeddingConfig;
pub use openai::OpenAIEmbedding;

/// Service for generating text embeddings.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Generates an embedding vector for a single text string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error>;

    /// Generates embedding vectors for multiple texts in a single API call, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error>;
}
