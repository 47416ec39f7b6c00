//! `search_tool`: similarity search over the customer document collection.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use vector_store::DocumentStore;

use super::{query_argument, query_parameters, Tool};

pub const SEARCH_TOOL_NAME: &str = "search_tool";
pub const SEARCH_TOOL_DESCRIPTION: &str = "Call this tool to search in customers information";

/// Returned instead of an empty list so the model can say it found nothing.
pub const NO_DOCUMENTS_NOTICE: &str = "No matching customer documents found.";

pub struct SearchTool {
    store: Arc<dyn DocumentStore>,
    k: usize,
}

impl SearchTool {
    pub fn new(store: Arc<dyn DocumentStore>, k: usize) -> Self {
        Self { store, k }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        SEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        SEARCH_TOOL_DESCRIPTION
    }

    fn parameters(&self) -> serde_json::Value {
        query_parameters("What to look up in the customer documents")
    }

    async fn call(&self, arguments: &serde_json::Value) -> anyhow::Result<String> {
        let query = query_argument(arguments)?;
        info!(query = %query, k = self.k, "search tool invoked");
        let documents = self.store.similarity_search(query, self.k).await?;
        if documents.is_empty() {
            return Ok(NO_DOCUMENTS_NOTICE.to_string());
        }
        Ok(serde_json::to_string(&documents)?)
    }
}
