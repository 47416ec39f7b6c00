//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for the two request shapes the agent needs: a chat
//! completion with a bound toolset (the model may answer or request tool calls) and a chat
//! completion constrained by a JSON schema (structured output).
//! Provides token masking for safe logging.

use async_openai::{
    types::{CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema},
    Client,
};
use std::sync::Arc;

pub use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionResponseMessage, ChatCompletionTool, ChatCompletionToolArgs,
    ChatCompletionToolType, FunctionCall, FunctionObjectArgs,
};

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_char_boundary(7) || !token.is_char_boundary(len - 4) {
        return "***".to_string();
    }
    format!("{}***{}", &token[..7], &token[len - 4..])
}

/// JSON schema that constrains a structured completion.
#[derive(Debug, Clone)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub description: Option<String>,
    pub schema: serde_json::Value,
}

/// OpenAI chat client. Wraps async-openai client; holds the API key for masked logging.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Arc<Client<async_openai::config::OpenAIConfig>>,
    /// API key stored only for logging (masked).
    api_key_for_logging: String,
}

impl OpenAIClient {
    /// Builds a client with a custom base URL (e.g. for proxies or compatible endpoints).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let api_key_for_logging = api_key.clone();
        let config = async_openai::config::OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            api_key_for_logging,
        }
    }

    /// The API key as it appears in logs.
    pub fn masked_key(&self) -> String {
        mask_token(&self.api_key_for_logging)
    }

    /// Sends a chat completion with `tools` bound and returns the first choice's message, which
    /// carries either text content or tool calls. An empty `tools` slice sends no tool field.
    pub async fn chat_completion_with_tools(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
        tools: Vec<ChatCompletionTool>,
    ) -> anyhow::Result<ChatCompletionResponseMessage> {
        tracing::info!(
            model = %model,
            message_count = messages.len(),
            tool_count = tools.len(),
            api_key = %self.masked_key(),
            "OpenAI chat_completion request"
        );

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(model).messages(messages);
        if !tools.is_empty() {
            args.tools(tools);
        }
        let request = args.build()?;

        if let Ok(json) = serde_json::to_string(&request) {
            tracing::debug!(request_json = %json, "OpenAI chat_completion request JSON");
        }

        let response = self.client.chat().create(request).await?;

        if let Some(ref u) = response.usage {
            tracing::info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "OpenAI chat_completion usage"
            );
        }

        match response.choices.into_iter().next() {
            Some(choice) => Ok(choice.message),
            None => anyhow::bail!("No response from OpenAI"),
        }
    }

    /// Sends a chat completion whose output must follow `format` (strict JSON schema) and
    /// returns the raw JSON text. A refusal from the model is returned as an error.
    pub async fn chat_completion_json(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
        format: &JsonSchemaFormat,
    ) -> anyhow::Result<String> {
        tracing::info!(
            model = %model,
            message_count = messages.len(),
            schema = %format.name,
            api_key = %self.masked_key(),
            "OpenAI structured completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    name: format.name.clone(),
                    description: format.description.clone(),
                    schema: Some(format.schema.clone()),
                    strict: Some(true),
                },
            })
            .build()?;

        let response = self.client.chat().create(request).await?;

        if let Some(ref u) = response.usage {
            tracing::info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "OpenAI structured completion usage"
            );
        }

        let Some(choice) = response.choices.into_iter().next() else {
            anyhow::bail!("No response from OpenAI");
        };
        if let Some(refusal) = choice.message.refusal {
            anyhow::bail!("Model refused structured output: {}", refusal);
        }
        choice
            .message
            .content
            .ok_or_else(|| anyhow::anyhow!("Structured completion returned no content"))
    }
}
