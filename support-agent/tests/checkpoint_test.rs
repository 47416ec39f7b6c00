//! Tests for `support_agent::checkpoint`: MemorySaver and SqliteSaver.
//!
//! **BDD style**: Given a saver, when conversations are saved and loaded, then the latest
//! history per thread is returned and shrinking or rewriting history is rejected.

use std::io::Write;
use std::sync::{Arc, Mutex};

use agent_core::{Conversation, Language, Message, StructuredReply, ToolCall};
use support_agent::{Checkpointer, MemorySaver, SqliteSaver};

/// Log sink shared between the test and a fmt subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn conversation(thread_id: &str, turns: &[(&str, &str)]) -> Conversation {
    let mut c = Conversation::new(thread_id);
    for (user, assistant) in turns {
        c.begin_turn(*user);
        c.push(Message::assistant(*assistant));
    }
    c
}

async fn saves_and_loads_latest(saver: &dyn Checkpointer) {
    assert!(saver.load("42").await.unwrap().is_none());

    let mut c = conversation("42", &[("Hello", "Hi!")]);
    saver.save(&c).await.unwrap();

    c.begin_turn("Find Acme");
    c.push(Message::assistant_with_tool_calls(
        "",
        vec![ToolCall::new("c1", "search_tool", r#"{"query":"Acme"}"#)],
    ));
    c.push(Message::tool("c1", "[]"));
    c.push(Message::assistant("Nothing found."));
    c.set_final_response(StructuredReply::new("Nothing found.", Language::En));
    saver.save(&c).await.unwrap();

    let loaded = saver.load("42").await.unwrap().unwrap();
    assert_eq!(loaded, c);
    assert_eq!(loaded.messages()[3].tool_calls[0].name, "search_tool");
}

async fn rejects_rewritten_history(saver: &dyn Checkpointer) {
    saver
        .save(&conversation("t", &[("a", "b"), ("c", "d")]))
        .await
        .unwrap();

    let shorter = conversation("t", &[("a", "b")]);
    assert!(saver.save(&shorter).await.is_err());

    let rewritten = conversation("t", &[("a", "changed"), ("c", "d")]);
    assert!(saver.save(&rewritten).await.is_err());

    assert_eq!(saver.load("t").await.unwrap().unwrap().len(), 4);
}

/// **Test: MemorySaver returns the latest saved conversation.**
#[tokio::test]
async fn memory_saver_saves_and_loads_latest() {
    saves_and_loads_latest(&MemorySaver::new()).await;
}

/// **Test: MemorySaver rejects history that does not extend the stored one.**
#[tokio::test]
async fn memory_saver_rejects_rewritten_history() {
    rejects_rewritten_history(&MemorySaver::new()).await;
}

/// **Test: SqliteSaver returns the latest saved conversation.**
#[tokio::test]
async fn sqlite_saver_saves_and_loads_latest() {
    saves_and_loads_latest(&SqliteSaver::in_memory().unwrap()).await;
}

/// **Test: SqliteSaver rejects history that does not extend the stored one.**
#[tokio::test]
async fn sqlite_saver_rejects_rewritten_history() {
    rejects_rewritten_history(&SqliteSaver::in_memory().unwrap()).await;
}

/// **Test: SqliteSaver data persists across reopen and threads are listed sorted.**
#[tokio::test]
async fn sqlite_saver_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("checkpoint.db");
    {
        let saver = SqliteSaver::open(&db).unwrap();
        saver.save(&conversation("b", &[("x", "y")])).await.unwrap();
        saver.save(&conversation("a", &[("p", "q")])).await.unwrap();
    }

    let saver = SqliteSaver::open(&db).unwrap();
    assert_eq!(saver.list_threads().await.unwrap(), ["a", "b"]);
    let b = saver.load("b").await.unwrap().unwrap();
    assert_eq!(b.messages()[0].content, "x");
}

/// **Test: open_existing refuses a missing database and does not create the file.**
#[tokio::test]
async fn sqlite_saver_open_existing_requires_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("typo.db");

    let err = SqliteSaver::open_existing(&db).err().unwrap();
    assert!(err.to_string().contains("does not exist"));
    assert!(!db.exists());

    SqliteSaver::open(&db)
        .unwrap()
        .save(&conversation("42", &[("Hello", "Hi!")]))
        .await
        .unwrap();
    let saver = SqliteSaver::open_existing(&db).unwrap();
    assert_eq!(saver.list_threads().await.unwrap(), ["42"]);
}

/// **Test: Both savers log checkpoint loads and saves at debug level.**
#[tokio::test]
async fn savers_log_load_and_save() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let memory = MemorySaver::new();
    let sqlite = SqliteSaver::in_memory().unwrap();
    for saver in [&memory as &dyn Checkpointer, &sqlite] {
        saver.load("7").await.unwrap();
        saver.save(&conversation("7", &[("Hello", "Hi!")])).await.unwrap();
        saver.load("7").await.unwrap();
    }

    let text = logs.text();
    assert_eq!(text.matches("checkpoint loaded").count(), 4);
    assert_eq!(text.matches("checkpoint saved").count(), 2);
    assert_eq!(text.matches("found=false").count(), 2);
    assert!(text.contains("thread_id=7"));
    assert!(text.contains("messages=2"));
}
