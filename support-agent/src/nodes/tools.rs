//! Tool executor: runs every tool call of the latest assistant message, in request order.

use agent_core::{AgentError, Conversation, Message, Result, ToolCall};
use tracing::{debug, info};

use crate::context::AgentContext;

/// Executes the pending tool calls and appends one tool-result message per call.
///
/// Calls run one after another; the first failure aborts the turn. Returns the number of
/// results appended.
pub async fn execute_tools(ctx: &AgentContext, conversation: &mut Conversation) -> Result<usize> {
    let calls = match conversation.last_message() {
        Some(message) if message.has_tool_calls() => message.tool_calls.clone(),
        _ => return Ok(0),
    };

    for call in &calls {
        let tool = ctx
            .tools
            .get(&call.name)
            .ok_or_else(|| AgentError::UnknownTool(call.name.clone()))?;
        let arguments = parse_arguments(call)?;
        info!(tool = %call.name, call_id = %call.id, "executing tool call");
        let output = tool.call(&arguments).await.map_err(|source| AgentError::Tool {
            name: call.name.clone(),
            source,
        })?;
        debug!(tool = %call.name, bytes = output.len(), "tool call finished");
        conversation.push(Message::tool(call.id.clone(), output));
    }
    Ok(calls.len())
}

/// Decodes the raw argument string; an empty string counts as `{}`.
fn parse_arguments(call: &ToolCall) -> Result<serde_json::Value> {
    let raw = call.arguments.trim();
    if raw.is_empty() {
        return Ok(serde_json::Value::Object(Default::default()));
    }
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| AgentError::InvalidToolArguments {
            name: call.name.clone(),
            reason: e.to_string(),
        })?;
    if !value.is_object() {
        return Err(AgentError::InvalidToolArguments {
            name: call.name.clone(),
            reason: "arguments must be a JSON object".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_arguments_are_an_empty_object() {
        let call = ToolCall::new("c1", "search_tool", "  ");
        assert_eq!(parse_arguments(&call).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let call = ToolCall::new("c1", "search_tool", r#"["acme"]"#);
        assert!(matches!(
            parse_arguments(&call),
            Err(AgentError::InvalidToolArguments { .. })
        ));
        let call = ToolCall::new("c1", "search_tool", "{query:");
        assert!(matches!(
            parse_arguments(&call),
            Err(AgentError::InvalidToolArguments { .. })
        ));
    }
}
