//! The three steps of a turn: agent step, tool executor, reply formatter.

pub mod llm;
pub mod respond;
pub mod tools;

pub use llm::agent_step;
pub use respond::{format_reply, parse_reply, response_schema, FORMATTER_INSTRUCTION, RESPONSE_SCHEMA_NAME};
pub use tools::execute_tools;
