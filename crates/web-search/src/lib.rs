//! # Web search
//!
//! [`WebSearch`] abstracts a search API restricted to configured domains; [`TavilyClient`]
//! implements it against the Tavily `/search` endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod tavily;

pub use tavily::TavilyClient;

pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";
pub const DEFAULT_MAX_RESULTS: u32 = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum WebSearchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Search API error {status}: {body}")]
    Api { status: u16, body: String },
}

/// Search settings. `include_domains` restricts every query.
#[derive(Debug, Clone)]
pub struct WebSearchConfig {
    pub api_key: String,
    pub base_url: String,
    pub include_domains: Vec<String>,
    pub max_results: u32,
    pub include_images: bool,
    pub timeout: Duration,
}

impl WebSearchConfig {
    /// Defaults: Tavily endpoint, 10 results, images included, 30 s timeout.
    pub fn new(api_key: impl Into<String>, include_domains: Vec<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            include_domains,
            max_results: DEFAULT_MAX_RESULTS,
            include_images: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One page hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Image reference returned alongside the hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebSearchResults {
    pub results: Vec<SearchHit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageRef>,
}

impl WebSearchResults {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.images.is_empty()
    }
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<WebSearchResults, WebSearchError>;
}
