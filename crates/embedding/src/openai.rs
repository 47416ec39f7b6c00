//! OpenAI embedding service (`text-embedding-ada-002`, `text-embedding-3-*`).

use async_openai::{types::CreateEmbeddingRequestArgs, Client};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::{EmbeddingConfig, EmbeddingService};

const EMBED_TIMEOUT: Duration = Duration::from_secs(30);
const EMBED_BATCH_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI embedding service. Holds the async-openai client and model name.
#[derive(Debug, Clone)]
pub struct OpenAIEmbedding {
    client: Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIEmbedding {
    /// Creates a service for `model`; `base_url` points at an OpenAI-compatible endpoint when set.
    pub fn new(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let mut openai_config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            openai_config = openai_config.with_api_base(url);
        }
        Self {
            client: Client::with_config(openai_config),
            model,
        }
    }

    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self::new(
            config.openai_api_key.clone(),
            config.model.clone(),
            config.openai_base_url.as_deref(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, inputs: Vec<String>, timeout: Duration) -> anyhow::Result<Vec<Vec<f32>>> {
        let expected = inputs.len();
        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(inputs)
            .build()?;

        let embeddings = self.client.embeddings();
        let response = match tokio::time::timeout(timeout, embeddings.create(request)).await {
            Ok(Ok(r)) => {
                debug!("OpenAI embed response received");
                r
            }
            Ok(Err(e)) => {
                warn!(error = %e, "OpenAI embed request failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "OpenAI embed request timed out");
                anyhow::bail!(
                    "OpenAI embed request timed out after {} seconds",
                    timeout.as_secs()
                );
            }
        };

        let mut data = response.data;
        data.sort_by_key(|item| item.index);
        let vectors: Vec<Vec<f32>> = data.into_iter().map(|item| item.embedding).collect();
        if vectors.len() != expected {
            anyhow::bail!("Expected {} embeddings, got {}", expected, vectors.len());
        }
        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingService for OpenAIEmbedding {
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        let mut vectors = self.request(vec![text.to_string()], EMBED_TIMEOUT).await?;
        let embedding = vectors
            .pop()
            .ok_or_else(|| anyhow::anyhow!("No embedding in response"))?;
        info!(dimension = embedding.len(), "embedding done");
        Ok(embedding)
    }

    #[instrument(skip(self, texts), fields(model = %self.model, batch_size = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let vectors = self.request(texts.to_vec(), EMBED_BATCH_TIMEOUT).await?;
        info!(count = vectors.len(), "embedding batch done");
        Ok(vectors)
    }
}
