//! `web_search_tool`: search restricted to the company website.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use web_search::WebSearch;

use super::{query_argument, query_parameters, Tool};

pub const WEB_SEARCH_TOOL_NAME: &str = "web_search_tool";
pub const WEB_SEARCH_TOOL_DESCRIPTION: &str = "Use this tool to search for information on the company's website. Make sure to pay attention to dates.";

pub const NO_WEB_RESULTS_NOTICE: &str = "No web results found.";

pub struct WebSearchTool {
    client: Arc<dyn WebSearch>,
}

impl WebSearchTool {
    pub fn new(client: Arc<dyn WebSearch>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        WEB_SEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        WEB_SEARCH_TOOL_DESCRIPTION
    }

    fn parameters(&self) -> serde_json::Value {
        query_parameters("What to search for on the company's website")
    }

    async fn call(&self, arguments: &serde_json::Value) -> anyhow::Result<String> {
        let query = query_argument(arguments)?;
        info!(query = %query, "web search tool invoked");
        let results = self.client.search(query).await?;
        if results.is_empty() {
            return Ok(NO_WEB_RESULTS_NOTICE.to_string());
        }
        Ok(serde_json::to_string(&results)?)
    }
}
