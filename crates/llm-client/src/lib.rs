//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and an OpenAI implementation. The agent loop only sees this
//! trait, so tests drive it with scripted fakes.
//!
//! Two calls are needed per turn: [`LlmClient::complete`] with the toolset bound (answer or
//! tool calls) and [`LlmClient::complete_structured`] for the reply formatter.

use agent_core::{Message, Role, ToolCall};
use anyhow::Result;
use async_trait::async_trait;
use openai_client::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionResponseMessage, ChatCompletionTool, ChatCompletionToolArgs,
    ChatCompletionToolType, FunctionCall, FunctionObjectArgs,
};

mod config;
mod openai_llm;

pub use config::{EnvLlmConfig, LlmConfig};
pub use openai_llm::OpenAILlmClient;

/// A tool the model may call: name, description and JSON-schema parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Named JSON schema for structured output.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    pub name: String,
    pub description: Option<String>,
    pub schema: serde_json::Value,
}

/// LLM client interface.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns one assistant message for `messages`; with `tools` bound the model may answer
    /// directly or request tool calls.
    async fn complete(&self, messages: &[Message], tools: &[ToolSpec]) -> Result<Message>;

    /// Returns the JSON object the model produced under `schema`.
    async fn complete_structured(
        &self,
        messages: &[Message],
        schema: &ResponseSchema,
    ) -> Result<serde_json::Value>;

    /// Model name, for logs and `info` output.
    fn model(&self) -> &str;
}

/// Converts a single [`Message`] into OpenAI API message format.
fn message_to_openai(msg: &Message) -> Result<ChatCompletionRequestMessage> {
    let content = msg.content.clone();
    let openai_msg: ChatCompletionRequestMessage = match msg.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::Assistant => {
            let mut args = ChatCompletionRequestAssistantMessageArgs::default();
            if !content.is_empty() || msg.tool_calls.is_empty() {
                args.content(content);
            }
            if !msg.tool_calls.is_empty() {
                args.tool_calls(msg.tool_calls.iter().map(tool_call_to_openai).collect::<Vec<_>>());
            }
            args.build()?.into()
        }
        Role::Tool => {
            let tool_call_id = msg.tool_call_id.clone().ok_or_else(|| {
                anyhow::anyhow!("tool message without tool_call_id cannot be sent to the model")
            })?;
            ChatCompletionRequestToolMessageArgs::default()
                .content(content)
                .tool_call_id(tool_call_id)
                .build()?
                .into()
        }
    };
    Ok(openai_msg)
}

fn tool_call_to_openai(call: &ToolCall) -> ChatCompletionMessageToolCall {
    ChatCompletionMessageToolCall {
        id: call.id.clone(),
        r#type: ChatCompletionToolType::Function,
        function: FunctionCall {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
        },
    }
}

fn tool_spec_to_openai(spec: &ToolSpec) -> Result<ChatCompletionTool> {
    let function = FunctionObjectArgs::default()
        .name(spec.name.clone())
        .description(spec.description.clone())
        .parameters(spec.parameters.clone())
        .build()?;
    Ok(ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(function)
        .build()?)
}

/// Converts the model's response message into an assistant [`Message`], keeping tool calls in
/// the order the model emitted them.
fn response_to_message(response: ChatCompletionResponseMessage) -> Message {
    let content = response.content.unwrap_or_default();
    let tool_calls: Vec<ToolCall> = response
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|c| ToolCall::new(c.id, c.function.name, c.function.arguments))
        .collect();
    if tool_calls.is_empty() {
        Message::assistant(content)
    } else {
        Message::assistant_with_tool_calls(content, tool_calls)
    }
}
