//! OpenAI implementation of [`LlmClient`]: wraps openai-client, optionally prepends a system prompt.

use agent_core::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use openai_client::JsonSchemaFormat;
use tracing::instrument;

use super::{
    message_to_openai, response_to_message, tool_spec_to_openai, LlmClient, LlmConfig,
    ResponseSchema, ToolSpec,
};
use crate::config::DEFAULT_MODEL;

/// LlmClient backed by the OpenAI chat-completions API.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
    model: String,
    system_prompt: Option<String>,
}

impl OpenAILlmClient {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
        }
    }

    /// Builds a client from any [`LlmConfig`].
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::with_base_url(config.api_key().to_string(), config.base_url().to_string())
            .with_model(config.model().to_string())
            .with_system_prompt_opt(config.system_prompt().map(str::to_string))
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_system_prompt_opt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages, tools), fields(model = %self.model, message_count = messages.len()))]
    async fn complete(&self, messages: &[Message], tools: &[ToolSpec]) -> Result<Message> {
        let mut openai_messages = Vec::with_capacity(messages.len() + 1);
        if let Some(prompt) = &self.system_prompt {
            openai_messages.push(message_to_openai(&Message::system(prompt.clone()))?);
        }
        for msg in messages {
            openai_messages.push(message_to_openai(msg)?);
        }
        let openai_tools = tools
            .iter()
            .map(tool_spec_to_openai)
            .collect::<Result<Vec<_>>>()?;

        let response = self
            .client
            .chat_completion_with_tools(&self.model, openai_messages, openai_tools)
            .await?;
        Ok(response_to_message(response))
    }

    #[instrument(skip(self, messages, schema), fields(model = %self.model, schema = %schema.name))]
    async fn complete_structured(
        &self,
        messages: &[Message],
        schema: &ResponseSchema,
    ) -> Result<serde_json::Value> {
        let openai_messages = messages
            .iter()
            .map(message_to_openai)
            .collect::<Result<Vec<_>>>()?;
        let format = JsonSchemaFormat {
            name: schema.name.clone(),
            description: schema.description.clone(),
            schema: schema.schema.clone(),
        };
        let raw = self
            .client
            .chat_completion_json(&self.model, openai_messages, &format)
            .await?;
        serde_json::from_str(&raw).with_context(|| format!("structured output is not JSON: {}", raw))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
