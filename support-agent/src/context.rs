//! Dependencies of a turn, built once at startup and passed into every step.

use std::sync::Arc;

use anyhow::{Context, Result};
use embedding::{EmbeddingConfig, EmbeddingService, OpenAIEmbedding};
use llm_client::{EnvLlmConfig, LlmClient, OpenAILlmClient};
use tracing::info;
use vector_store::{DocumentStore, PgVectorStore};
use web_search::{TavilyClient, WebSearch, WebSearchConfig};

use crate::config::{AppConfig, DEFAULT_MAX_AGENT_STEPS};
use crate::tools::{SearchTool, ToolRegistry, WebSearchTool};

#[derive(Clone)]
pub struct AgentContext {
    pub llm: Arc<dyn LlmClient>,
    pub tools: ToolRegistry,
    /// Agent steps allowed per turn.
    pub max_agent_steps: usize,
}

impl AgentContext {
    pub fn new(llm: Arc<dyn LlmClient>, tools: ToolRegistry) -> Self {
        Self {
            llm,
            tools,
            max_agent_steps: DEFAULT_MAX_AGENT_STEPS,
        }
    }

    pub fn with_max_agent_steps(mut self, max_agent_steps: usize) -> Self {
        self.max_agent_steps = max_agent_steps;
        self
    }

    /// Context with the standard toolset over the given backends.
    pub fn with_backends(
        llm: Arc<dyn LlmClient>,
        store: Arc<dyn DocumentStore>,
        web: Arc<dyn WebSearch>,
        search_top_k: usize,
    ) -> Self {
        let tools = ToolRegistry::new()
            .register(Arc::new(SearchTool::new(store, search_top_k)))
            .register(Arc::new(WebSearchTool::new(web)));
        Self::new(llm, tools)
    }

    /// Builds the production stack: OpenAI chat model, pgvector store, Tavily search.
    pub async fn connect(
        app: &AppConfig,
        llm_config: &EnvLlmConfig,
        embedding_config: &EmbeddingConfig,
    ) -> Result<Self> {
        let llm: Arc<dyn LlmClient> = Arc::new(OpenAILlmClient::from_config(llm_config));

        let embeddings: Arc<dyn EmbeddingService> =
            Arc::new(OpenAIEmbedding::from_config(embedding_config));
        let store = PgVectorStore::connect(&app.database_url, app.collection.clone(), embeddings)
            .await
            .context("connect to the document store")?;

        let web_config = WebSearchConfig::new(
            app.tavily_api_key.clone(),
            vec![app.company_domain.clone()],
        )
        .with_max_results(app.web_search_max_results)
        .with_timeout(app.web_search_timeout);
        let web = TavilyClient::new(web_config).context("build web search client")?;

        info!(
            model = llm.model(),
            collection = %app.collection,
            domain = %app.company_domain,
            "agent context ready"
        );
        Ok(
            Self::with_backends(llm, Arc::new(store), Arc::new(web), app.search_top_k)
                .with_max_agent_steps(app.max_agent_steps),
        )
    }
}
