//! Tavily search client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{ImageRef, SearchHit, WebSearch, WebSearchConfig, WebSearchError, WebSearchResults};

#[derive(Debug, Serialize)]
struct TavilySearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    max_results: u32,
    include_domains: &'a [String],
    include_images: bool,
    include_answer: bool,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
    #[serde(default)]
    images: Vec<TavilyImage>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    published_date: Option<String>,
}

/// Images come back as bare URLs, or as objects when descriptions are requested.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TavilyImage {
    Url(String),
    Described {
        url: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl From<TavilyImage> for ImageRef {
    fn from(image: TavilyImage) -> Self {
        match image {
            TavilyImage::Url(url) => ImageRef {
                url,
                description: None,
            },
            TavilyImage::Described { url, description } => ImageRef { url, description },
        }
    }
}

/// Tavily search client - optimized for AI agents.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    config: WebSearchConfig,
    http_client: Client,
}

impl TavilyClient {
    pub fn new(config: WebSearchConfig) -> Result<Self, WebSearchError> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &WebSearchConfig {
        &self.config
    }
}

#[async_trait]
impl WebSearch for TavilyClient {
    #[instrument(skip(self), fields(domains = ?self.config.include_domains))]
    async fn search(&self, query: &str) -> Result<WebSearchResults, WebSearchError> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let request = TavilySearchRequest {
            api_key: &self.config.api_key,
            query,
            search_depth: "advanced",
            max_results: self.config.max_results,
            include_domains: &self.config.include_domains,
            include_images: self.config.include_images,
            include_answer: false,
            include_raw_content: false,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = status.as_u16(), "Tavily search failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED => WebSearchError::InvalidApiKey,
                StatusCode::TOO_MANY_REQUESTS => WebSearchError::RateLimitExceeded,
                _ => WebSearchError::Api {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let parsed: TavilySearchResponse = response.json().await?;
        let results = WebSearchResults {
            results: parsed
                .results
                .into_iter()
                .map(|r| SearchHit {
                    title: r.title,
                    url: r.url,
                    content: r.content,
                    published_date: r.published_date,
                    score: r.score,
                })
                .collect(),
            images: parsed.images.into_iter().map(ImageRef::from).collect(),
        };
        info!(
            results = results.results.len(),
            images = results.images.len(),
            "Tavily search done"
        );
        Ok(results)
    }
}
