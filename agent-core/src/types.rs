//! Conversation types: [`Message`], [`ToolCall`] and the append-only [`Conversation`] log.

use serde::{Deserialize, Serialize};

use crate::reply::StructuredReply;

/// Role of a message, one-to-one with the chat-completions `role` values.
///
/// `System` is only used for model input (formatter instruction, system prompt); it is never
/// appended to a [`Conversation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-issued call id; echoed back on the tool-result message.
    pub id: String,
    pub name: String,
    /// Raw JSON arguments as emitted by the model.
    pub arguments: String,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Non-empty only for assistant messages that request tools.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Set only for tool-result messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::plain(Role::Assistant, content)
        }
    }

    /// Result of the tool call identified by `tool_call_id`.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::plain(Role::Tool, content)
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Message history of one thread plus the structured reply of its latest turn.
///
/// Messages can only be appended; there is no API to edit or remove one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    thread_id: String,
    messages: Vec<Message>,
    #[serde(default)]
    final_response: Option<StructuredReply>,
}

impl Conversation {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            messages: Vec::new(),
            final_response: None,
        }
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Starts a new turn: drops the previous turn's reply and appends the user input.
    pub fn begin_turn(&mut self, user_input: impl Into<String>) {
        self.final_response = None;
        self.messages.push(Message::user(user_input));
    }

    pub fn final_response(&self) -> Option<&StructuredReply> {
        self.final_response.as_ref()
    }

    pub fn set_final_response(&mut self, reply: StructuredReply) {
        self.final_response = Some(reply);
    }

    /// True when `self` holds every message of `earlier` as an unchanged prefix.
    pub fn extends(&self, earlier: &Conversation) -> bool {
        self.thread_id == earlier.thread_id
            && self.messages.len() >= earlier.messages.len()
            && self.messages[..earlier.messages.len()] == earlier.messages[..]
    }
}
