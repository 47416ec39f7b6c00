//! Drives one turn through the [`TurnState`] machine.

use agent_core::{AgentError, Conversation, Result, StructuredReply};
use tracing::{debug, info, warn};

use crate::context::AgentContext;
use crate::nodes::{agent_step, execute_tools, format_reply};
use crate::router::{route, TurnState};

/// Runs the loop on `conversation` (the user message must already be appended) and returns the
/// formatted reply, which is also stored as the conversation's final response.
///
/// Each entry into `Running` costs one agent step; once `ctx.max_agent_steps` are spent without
/// reaching `Done` the turn fails with [`AgentError::StepLimitExceeded`].
pub async fn run_graph(ctx: &AgentContext, conversation: &mut Conversation) -> Result<StructuredReply> {
    let mut state = TurnState::Running;
    let mut steps = 0usize;

    loop {
        let next = match state {
            TurnState::Running => {
                if steps >= ctx.max_agent_steps {
                    warn!(steps, thread_id = conversation.thread_id(), "step limit reached");
                    return Err(AgentError::StepLimitExceeded(ctx.max_agent_steps));
                }
                steps += 1;
                agent_step(ctx, conversation).await?;
                route(conversation.last_message())
            }
            TurnState::InvokingTools => {
                execute_tools(ctx, conversation).await?;
                TurnState::Running
            }
            TurnState::Done => {
                let reply = format_reply(ctx, conversation).await?;
                conversation.set_final_response(reply.clone());
                info!(
                    thread_id = conversation.thread_id(),
                    steps,
                    language = %reply.language,
                    "turn done"
                );
                return Ok(reply);
            }
        };
        debug!(from = ?state, to = ?next, "transition");
        state = next;
    }
}
