//! # agent-core
//!
//! Core types for the support agent: [`Message`], [`Conversation`], [`StructuredReply`] and
//! [`Language`], the [`AgentError`] / [`ConfigError`] taxonomy, and tracing initialization.
//! Transport-agnostic; used by llm-client and support-agent.

pub mod error;
pub mod logger;
pub mod reply;
pub mod types;

pub use error::{AgentError, ConfigError, Result};
pub use logger::init_tracing;
pub use reply::{Language, StructuredReply};
pub use types::{Conversation, Message, Role, ToolCall};
