//! Embedding configuration loaded from the environment.

use agent_core::ConfigError;
use std::env;

/// `OpenAIEmbeddings` default; the customer collection is embedded with it.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub model: String,
}

impl EmbeddingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());
        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?,
            openai_base_url: get("OPENAI_BASE_URL"),
            model: get("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_defaults_to_ada() {
        let cfg = EmbeddingConfig::from_lookup(|name| {
            (name == "OPENAI_API_KEY").then(|| "sk-test".to_string())
        })
        .unwrap();
        assert_eq!(cfg.model, DEFAULT_EMBEDDING_MODEL);
        assert!(cfg.openai_base_url.is_none());
    }

    #[test]
    fn key_is_required() {
        let err = EmbeddingConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
    }
}
