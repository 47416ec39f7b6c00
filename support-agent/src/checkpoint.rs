//! Per-thread conversation checkpoints.
//!
//! **Stores**: [`MemorySaver`] keeps conversations in process (the default); [`SqliteSaver`]
//! writes one JSON row per thread to a SQLite file so a thread survives restarts.
//!
//! **Invariant**: history only grows. `save` rejects a conversation whose messages do not start
//! with the stored ones ([`Conversation::extends`]).

use std::path::Path;
use std::sync::{Arc, Mutex};

use agent_core::{Conversation, Role};
use anyhow::{Context, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::debug;

#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Latest saved conversation of `thread_id`, if any.
    async fn load(&self, thread_id: &str) -> Result<Option<Conversation>>;

    /// Replaces the stored conversation of its thread.
    async fn save(&self, conversation: &Conversation) -> Result<()>;

    /// Known thread ids, sorted.
    async fn list_threads(&self) -> Result<Vec<String>>;
}

fn ensure_extends(conversation: &Conversation, stored: Option<&Conversation>) -> Result<()> {
    match stored {
        Some(stored) if !conversation.extends(stored) => anyhow::bail!(
            "conversation for thread {} does not extend the stored history ({} stored, {} given)",
            conversation.thread_id(),
            stored.len(),
            conversation.len()
        ),
        _ => Ok(()),
    }
}

/// In-process checkpointer.
#[derive(Default)]
pub struct MemorySaver {
    threads: DashMap<String, Conversation>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Checkpointer for MemorySaver {
    async fn load(&self, thread_id: &str) -> Result<Option<Conversation>> {
        let conversation = self.threads.get(thread_id).map(|c| c.value().clone());
        debug!(
            thread_id,
            messages = conversation.as_ref().map_or(0, Conversation::len),
            found = conversation.is_some(),
            "checkpoint loaded"
        );
        Ok(conversation)
    }

    async fn save(&self, conversation: &Conversation) -> Result<()> {
        let mut entry = self
            .threads
            .entry(conversation.thread_id().to_string())
            .or_insert_with(|| Conversation::new(conversation.thread_id()));
        ensure_extends(conversation, Some(entry.value()))?;
        *entry = conversation.clone();
        debug!(
            thread_id = conversation.thread_id(),
            messages = conversation.len(),
            "checkpoint saved"
        );
        Ok(())
    }

    async fn list_threads(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.threads.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        Ok(ids)
    }
}

/// SQLite-backed checkpointer: table `checkpoints(thread_id, conversation, updated_at)`.
#[derive(Clone)]
pub struct SqliteSaver {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSaver {
    /// Opens (or creates) the database at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref())
            .with_context(|| format!("open checkpoint db {:?}", db_path.as_ref()))?;
        Self::with_connection(conn)
    }

    /// Opens the database at `db_path` without creating it; a missing file is an error.
    pub fn open_existing(db_path: impl AsRef<Path>) -> Result<Self> {
        let path = db_path.as_ref();
        if !path.is_file() {
            anyhow::bail!("checkpoint database {} does not exist", path.display());
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("open checkpoint db {:?}", path))?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS checkpoints (
                thread_id TEXT PRIMARY KEY,
                conversation TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| anyhow::anyhow!("checkpoint connection poisoned"))?;
            f(&guard)
        })
        .await
        .context("checkpoint task panicked")?
    }
}

fn read_conversation(conn: &Connection, thread_id: &str) -> Result<Option<Conversation>> {
    let json: Option<String> = conn
        .query_row(
            "SELECT conversation FROM checkpoints WHERE thread_id = ?1",
            params![thread_id],
            |row| row.get(0),
        )
        .optional()?;
    json.map(|s| {
        serde_json::from_str::<Conversation>(&s)
            .with_context(|| format!("decode checkpoint of thread {}", thread_id))
    })
    .transpose()
}

#[async_trait]
impl Checkpointer for SqliteSaver {
    async fn load(&self, thread_id: &str) -> Result<Option<Conversation>> {
        let thread_id = thread_id.to_string();
        let conversation = self
            .with_conn({
                let thread_id = thread_id.clone();
                move |conn| read_conversation(conn, &thread_id)
            })
            .await?;
        debug!(
            thread_id = %thread_id,
            messages = conversation.as_ref().map_or(0, Conversation::len),
            found = conversation.is_some(),
            "checkpoint loaded"
        );
        Ok(conversation)
    }

    async fn save(&self, conversation: &Conversation) -> Result<()> {
        let thread_id = conversation.thread_id().to_string();
        let messages = conversation.len();
        let conversation = conversation.clone();
        let json = serde_json::to_string(&conversation)?;
        self.with_conn(move |conn| {
            let stored = read_conversation(conn, conversation.thread_id())?;
            ensure_extends(&conversation, stored.as_ref())?;
            conn.execute(
                r#"
                INSERT INTO checkpoints (thread_id, conversation, updated_at)
                VALUES (?1, ?2, CURRENT_TIMESTAMP)
                ON CONFLICT(thread_id) DO UPDATE
                SET conversation = excluded.conversation, updated_at = CURRENT_TIMESTAMP
                "#,
                params![conversation.thread_id(), json],
            )?;
            Ok(())
        })
        .await?;
        debug!(thread_id = %thread_id, messages, "checkpoint saved");
        Ok(())
    }

    async fn list_threads(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT thread_id FROM checkpoints ORDER BY thread_id")?;
            let ids = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(ids)
        })
        .await
    }
}

const PREVIEW_CHARS: usize = 80;

/// Human-readable summary of a thread: message count, role-tagged previews, last reply.
pub fn format_thread_summary(conversation: &Conversation) -> String {
    let mut out = format!(
        "Thread {}: {} message(s)\n",
        conversation.thread_id(),
        conversation.len()
    );
    for (i, message) in conversation.messages().iter().enumerate() {
        let tag = match message.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        };
        let mut line = preview(&message.content);
        if message.has_tool_calls() {
            let names: Vec<&str> = message.tool_calls.iter().map(|c| c.name.as_str()).collect();
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&format!("[calls: {}]", names.join(", ")));
        }
        out.push_str(&format!("  {:>3}. {:<9} {}\n", i + 1, tag, line));
    }
    if let Some(reply) = conversation.final_response() {
        out.push_str(&format!("Last reply: {}\n", reply));
    }
    out
}

fn preview(content: &str) -> String {
    let single_line = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= PREVIEW_CHARS {
        single_line
    } else {
        let cut: String = single_line.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::{Language, Message, StructuredReply, ToolCall};

    #[test]
    fn summary_tags_roles_and_tool_calls() {
        let mut c = Conversation::new("t1");
        c.begin_turn("Where is the office?");
        c.push(Message::assistant_with_tool_calls(
            "",
            vec![ToolCall::new("c1", "web_search_tool", "{}")],
        ));
        c.push(Message::tool("c1", "results"));
        c.push(Message::assistant("On Main street."));
        c.set_final_response(StructuredReply::new("On Main street.", Language::En));

        let summary = format_thread_summary(&c);
        assert!(summary.starts_with("Thread t1: 4 message(s)"));
        assert!(summary.contains("user      Where is the office?"));
        assert!(summary.contains("[calls: web_search_tool]"));
        assert!(summary.contains("Last reply: [en] On Main street."));
    }

    #[test]
    fn preview_truncates_long_content() {
        let long = "word ".repeat(40);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }
}
