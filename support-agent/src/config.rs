//! Application config: document store, web search, loop limits. Loaded from env.
//!
//! LLM and embedding settings live in their own crates ([`llm_client::EnvLlmConfig`],
//! [`embedding::EmbeddingConfig`]).

use agent_core::ConfigError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_COLLECTION: &str = "customers";
pub const DEFAULT_SEARCH_TOP_K: usize = 3;
pub const DEFAULT_WEB_SEARCH_MAX_RESULTS: u32 = 10;
pub const DEFAULT_WEB_SEARCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_AGENT_STEPS: usize = 25;
pub const DEFAULT_THREAD_ID: &str = "42";
pub const DEFAULT_LOG_FILE: &str = "logs/support-agent.log";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// DATABASE_URL: pgvector database holding the customer collection.
    pub database_url: String,
    /// COMPANY_DOMAIN: the only domain web search may return.
    pub company_domain: String,
    /// TAVILY_API_KEY
    pub tavily_api_key: String,
    /// VECTOR_COLLECTION
    pub collection: String,
    /// SEARCH_TOP_K
    pub search_top_k: usize,
    /// WEB_SEARCH_MAX_RESULTS
    pub web_search_max_results: u32,
    /// WEB_SEARCH_TIMEOUT_SECS
    pub web_search_timeout: Duration,
    /// MAX_AGENT_STEPS: model calls allowed per turn before the turn is aborted.
    pub max_agent_steps: usize,
    /// THREAD_ID
    pub thread_id: String,
    /// LOG_FILE
    pub log_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let database_url = required("DATABASE_URL")?;
        let company_domain = required("COMPANY_DOMAIN")?;
        let tavily_api_key = required("TAVILY_API_KEY")?;

        let search_top_k = non_zero(
            parse_or(get("SEARCH_TOP_K"), "SEARCH_TOP_K", DEFAULT_SEARCH_TOP_K)?,
            "SEARCH_TOP_K",
        )?;
        let web_search_max_results = non_zero(
            parse_or(
                get("WEB_SEARCH_MAX_RESULTS"),
                "WEB_SEARCH_MAX_RESULTS",
                DEFAULT_WEB_SEARCH_MAX_RESULTS,
            )?,
            "WEB_SEARCH_MAX_RESULTS",
        )?;
        let timeout_secs = non_zero(
            parse_or(
                get("WEB_SEARCH_TIMEOUT_SECS"),
                "WEB_SEARCH_TIMEOUT_SECS",
                DEFAULT_WEB_SEARCH_TIMEOUT_SECS,
            )?,
            "WEB_SEARCH_TIMEOUT_SECS",
        )?;
        let max_agent_steps = non_zero(
            parse_or(get("MAX_AGENT_STEPS"), "MAX_AGENT_STEPS", DEFAULT_MAX_AGENT_STEPS)?,
            "MAX_AGENT_STEPS",
        )?;

        Ok(Self {
            database_url,
            company_domain,
            tavily_api_key,
            collection: get("VECTOR_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            search_top_k,
            web_search_max_results,
            web_search_timeout: Duration::from_secs(timeout_secs),
            max_agent_steps,
            thread_id: get("THREAD_ID").unwrap_or_else(|| DEFAULT_THREAD_ID.to_string()),
            log_file: get("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        })
    }
}

fn parse_or<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: format!("{:?}: {}", raw, e),
        }),
    }
}

/// Rejects 0 for values that size a component.
fn non_zero<T>(value: T, name: &'static str) -> Result<T, ConfigError>
where
    T: PartialEq + From<u8>,
{
    if value == T::from(0) {
        return Err(ConfigError::Invalid {
            name,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}
