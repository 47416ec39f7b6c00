//! Turn state machine: `Running` → (`InvokingTools` → `Running`)* → `Done`.

use agent_core::Message;

/// Where a turn is. Starts in `Running`; `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Waiting for the model's next message.
    Running,
    /// The latest assistant message requested tools.
    InvokingTools,
    /// The model answered; only formatting remains.
    Done,
}

/// Next state after an agent step, decided by the latest message.
pub fn route(last: Option<&Message>) -> TurnState {
    match last {
        Some(message) if message.has_tool_calls() => TurnState::InvokingTools,
        _ => TurnState::Done,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::ToolCall;

    #[test]
    fn tool_calls_route_to_tools() {
        let msg = Message::assistant_with_tool_calls(
            "",
            vec![ToolCall::new("call_1", "search_tool", r#"{"query":"acme"}"#)],
        );
        assert_eq!(route(Some(&msg)), TurnState::InvokingTools);
    }

    #[test]
    fn plain_answer_routes_to_done() {
        assert_eq!(route(Some(&Message::assistant("Hello!"))), TurnState::Done);
        assert_eq!(route(None), TurnState::Done);
    }
}
