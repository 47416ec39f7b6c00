//! Customer-support chat agent with a tool-calling loop.
//!
//! **Turn flow**: `AgentRunner::run_turn(thread_id, input)` loads the thread from the
//! [`Checkpointer`], appends the user message and drives `run_graph`:
//! Running (agent step) → InvokingTools (tool executor) → Running … → Done (reply formatter).
//! The conversation is saved only when the turn reaches Done.
//!
//! **Tools**: `search_tool` (similarity search over the customer collection) and
//! `web_search_tool` (search restricted to the company domain).

pub mod chat;
pub mod checkpoint;
pub mod config;
pub mod context;
pub mod graph;
pub mod nodes;
pub mod router;
pub mod runner;
pub mod tools;

pub use chat::{chat_once, is_exit_command, run_chat_loop};
pub use checkpoint::{format_thread_summary, Checkpointer, MemorySaver, SqliteSaver};
pub use config::AppConfig;
pub use context::AgentContext;
pub use graph::run_graph;
pub use router::{route, TurnState};
pub use runner::AgentRunner;
pub use tools::{SearchTool, Tool, ToolRegistry, WebSearchTool};
