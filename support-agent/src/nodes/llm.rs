//! Agent step: one model call with the toolset bound, one new assistant message.

use agent_core::{AgentError, Conversation, Result, Role};
use tracing::debug;

use crate::context::AgentContext;

pub async fn agent_step(ctx: &AgentContext, conversation: &mut Conversation) -> Result<()> {
    let specs = ctx.tools.specs();
    let mut reply = ctx
        .llm
        .complete(conversation.messages(), &specs)
        .await
        .map_err(AgentError::Llm)?;
    reply.role = Role::Assistant;
    debug!(
        thread_id = conversation.thread_id(),
        tool_calls = reply.tool_calls.len(),
        "agent step produced a message"
    );
    conversation.push(reply);
    Ok(())
}
