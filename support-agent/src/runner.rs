//! Turn runner: checkpoint load → loop → checkpoint save, serialised per thread.

use std::sync::Arc;

use agent_core::{AgentError, Conversation, Result, StructuredReply};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::checkpoint::Checkpointer;
use crate::context::AgentContext;
use crate::graph::run_graph;

pub struct AgentRunner {
    ctx: AgentContext,
    checkpointer: Arc<dyn Checkpointer>,
    thread_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AgentRunner {
    pub fn new(ctx: AgentContext, checkpointer: Arc<dyn Checkpointer>) -> Self {
        Self {
            ctx,
            checkpointer,
            thread_locks: DashMap::new(),
        }
    }

    pub fn context(&self) -> &AgentContext {
        &self.ctx
    }

    pub fn checkpointer(&self) -> &Arc<dyn Checkpointer> {
        &self.checkpointer
    }

    /// Number of threads with a turn running or queued.
    pub fn busy_threads(&self) -> usize {
        self.thread_locks.len()
    }

    fn thread_lock(&self, thread_id: &str) -> Arc<Mutex<()>> {
        self.thread_locks
            .entry(thread_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the lock entry of `thread_id` once no turn holds or awaits it.
    fn release_thread_lock(&self, thread_id: &str) {
        self.thread_locks.remove_if(thread_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Runs one turn of `thread_id` with `input` and returns the structured reply.
    ///
    /// Turns on the same thread queue behind each other. The checkpoint is written only when
    /// the turn succeeds; after a failure the stored thread is unchanged.
    pub async fn run_turn(&self, thread_id: &str, input: &str) -> Result<StructuredReply> {
        let lock = self.thread_lock(thread_id);
        let result = {
            let _guard = lock.lock().await;
            self.locked_turn(thread_id, input).await
        };
        drop(lock);
        self.release_thread_lock(thread_id);
        result
    }

    async fn locked_turn(&self, thread_id: &str, input: &str) -> Result<StructuredReply> {
        let mut conversation = self
            .checkpointer
            .load(thread_id)
            .await
            .map_err(AgentError::Checkpoint)?
            .unwrap_or_else(|| Conversation::new(thread_id));
        let history = conversation.len();
        info!(thread_id, history, "turn started");

        conversation.begin_turn(input);
        let reply = match run_graph(&self.ctx, &mut conversation).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(thread_id, error = %e, "turn failed; checkpoint left unchanged");
                return Err(e);
            }
        };

        self.checkpointer
            .save(&conversation)
            .await
            .map_err(AgentError::Checkpoint)?;
        info!(
            thread_id,
            appended = conversation.len() - history,
            "turn committed"
        );
        Ok(reply)
    }

    /// Saved conversation of `thread_id`, if any.
    pub async fn conversation(&self, thread_id: &str) -> Result<Option<Conversation>> {
        self.checkpointer
            .load(thread_id)
            .await
            .map_err(AgentError::Checkpoint)
    }
}
