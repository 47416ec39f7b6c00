//! Tools the model can call, and the registry that binds them to the agent.
//!
//! Each [`Tool`] exposes a name, a description and a JSON-schema for its arguments; the
//! [`ToolRegistry`] turns them into [`ToolSpec`]s for the model and looks tools up by name when
//! the model requests one.

use std::sync::Arc;

use async_trait::async_trait;
use llm_client::ToolSpec;
use serde_json::json;

mod search_tool;
mod web_search_tool;

pub use search_tool::{SearchTool, NO_DOCUMENTS_NOTICE, SEARCH_TOOL_DESCRIPTION, SEARCH_TOOL_NAME};
pub use web_search_tool::{
    WebSearchTool, NO_WEB_RESULTS_NOTICE, WEB_SEARCH_TOOL_DESCRIPTION, WEB_SEARCH_TOOL_NAME,
};

/// A function the model can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn parameters(&self) -> serde_json::Value;

    /// Runs the tool; the returned text becomes the tool-result message content.
    async fn call(&self, arguments: &serde_json::Value) -> anyhow::Result<String>;
}

/// Schema shared by tools that take a single `query` string.
pub fn query_parameters(description: &str) -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "query": { "type": "string", "description": description }
        },
        "required": ["query"]
    })
}

/// Reads the `query` argument.
pub fn query_argument(arguments: &serde_json::Value) -> anyhow::Result<&str> {
    arguments
        .get("query")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("missing string argument `query`"))
}

/// Ordered set of tools bound to the model.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool; a tool with the same name replaces the earlier one.
    pub fn register(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .iter()
            .map(|t| ToolSpec {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
