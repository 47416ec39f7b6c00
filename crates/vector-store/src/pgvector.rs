//! PostgreSQL/pgvector document store compatible with LangChain's `PGVector` schema.

use std::sync::Arc;

use async_trait::async_trait;
use embedding::EmbeddingService;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::info;

use crate::{Document, DocumentStore};

/// Cosine distance (`<=>`), the `PGVector` default strategy.
const SIMILARITY_QUERY: &str = r#"
SELECT e.document, e.cmetadata, (e.embedding <=> $1::text::vector)::float8 AS distance
FROM langchain_pg_embedding e
JOIN langchain_pg_collection c ON e.collection_id = c.uuid
WHERE c.name = $2
ORDER BY e.embedding <=> $1::text::vector
LIMIT $3
"#;

/// Strips SQLAlchemy driver suffixes (`postgresql+psycopg://`) so the URL is a plain libpq URL.
pub fn normalize_database_url(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let base = scheme.split('+').next().unwrap_or(scheme);
            format!("{}://{}", base, rest)
        }
        None => url.to_string(),
    }
}

/// Formats a vector as a pgvector text literal: `[0.1,0.2,0.3]`.
pub fn vector_literal(vector: &[f32]) -> String {
    let parts: Vec<String> = vector.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(","))
}

/// Document store backed by pgvector tables.
#[derive(Clone)]
pub struct PgVectorStore {
    pool: PgPool,
    collection: String,
    embeddings: Arc<dyn EmbeddingService>,
}

impl PgVectorStore {
    /// Connects to `database_url` and searches `collection`, embedding queries with `embeddings`.
    pub async fn connect(
        database_url: &str,
        collection: impl Into<String>,
        embeddings: Arc<dyn EmbeddingService>,
    ) -> Result<Self, sqlx::Error> {
        let url = normalize_database_url(database_url);
        let collection = collection.into();
        info!(collection = %collection, "Connecting pgvector document store");
        let pool = PgPoolOptions::new().max_connections(5).connect(&url).await?;
        Ok(Self::with_pool(pool, collection, embeddings))
    }

    pub fn with_pool(
        pool: PgPool,
        collection: impl Into<String>,
        embeddings: Arc<dyn EmbeddingService>,
    ) -> Self {
        Self {
            pool,
            collection: collection.into(),
            embeddings,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl DocumentStore for PgVectorStore {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>, anyhow::Error> {
        let query_embedding = self.embeddings.embed(query).await?;
        info!(
            collection = %self.collection,
            dimension = query_embedding.len(),
            k,
            "pgvector similarity search"
        );

        let limit = i64::try_from(k)?;
        let rows = sqlx::query(SIMILARITY_QUERY)
            .bind(vector_literal(&query_embedding))
            .bind(&self.collection)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in rows {
            let content: Option<String> = row.try_get("document")?;
            let metadata: Option<serde_json::Value> = row.try_get("cmetadata")?;
            let distance: f64 = row.try_get("distance")?;
            tracing::debug!(distance, "pgvector match");
            documents.push(Document {
                content: content.unwrap_or_default(),
                metadata: metadata.unwrap_or(serde_json::Value::Null),
            });
        }
        info!(count = documents.len(), "pgvector similarity search done");
        Ok(documents)
    }
}
