//! Test doubles shared by the support-agent integration tests.
//!
//! - [`ScriptedLlm`]: plays back queued assistant messages and records every request.
//! - [`RecordingStore`]: document store returning fixed documents, recording queries.
//! - [`FakeWebSearch`]: web search returning fixed results or a fixed error.
//! - [`KeywordEmbedding`]: bag-of-words embedding for ranking through `InMemoryDocumentStore`.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use agent_core::{Language, Message, ToolCall};
use async_trait::async_trait;
use embedding::EmbeddingService;
use llm_client::{LlmClient, ResponseSchema, ToolSpec};
use serde_json::json;
use support_agent::AgentContext;
use vector_store::{Document, DocumentStore, InMemoryDocumentStore};
use web_search::{SearchHit, WebSearch, WebSearchError, WebSearchResults};

/// Scripted model. `complete` pops the next queued step; `complete_structured` pops a queued
/// JSON value, or echoes the message it was asked to format as `{content, language}`.
#[derive(Default)]
pub struct ScriptedLlm {
    steps: Mutex<VecDeque<anyhow::Result<Message>>>,
    structured: Mutex<VecDeque<serde_json::Value>>,
    pub requests: Mutex<Vec<(Vec<Message>, Vec<String>)>>,
    pub structured_requests: Mutex<Vec<(Vec<Message>, String)>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, content: &str) -> Self {
        self.push_step(Ok(Message::assistant(content)))
    }

    /// Queues an assistant message requesting `calls` as `(id, tool, arguments)`.
    pub fn call_tools(self, calls: &[(&str, &str, &str)]) -> Self {
        let calls = calls
            .iter()
            .map(|(id, name, args)| ToolCall::new(*id, *name, *args))
            .collect();
        self.push_step(Ok(Message::assistant_with_tool_calls("", calls)))
    }

    pub fn fail(self, error: &str) -> Self {
        self.push_step(Err(anyhow::anyhow!(error.to_string())))
    }

    pub fn format_as(self, value: serde_json::Value) -> Self {
        self.structured.lock().unwrap().push_back(value);
        self
    }

    fn push_step(self, step: anyhow::Result<Message>) -> Self {
        self.steps.lock().unwrap().push_back(step);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Vec<Message> {
        self.requests.lock().unwrap().last().map(|r| r.0.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, messages: &[Message], tools: &[ToolSpec]) -> anyhow::Result<Message> {
        self.requests.lock().unwrap().push((
            messages.to_vec(),
            tools.iter().map(|t| t.name.clone()).collect(),
        ));
        self.steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))
    }

    async fn complete_structured(
        &self,
        messages: &[Message],
        schema: &ResponseSchema,
    ) -> anyhow::Result<serde_json::Value> {
        self.structured_requests
            .lock()
            .unwrap()
            .push((messages.to_vec(), schema.name.clone()));
        if let Some(value) = self.structured.lock().unwrap().pop_front() {
            return Ok(value);
        }
        let content = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        let language = Language::detect(&content);
        Ok(json!({ "content": content, "language": language.code() }))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Document store with fixed contents.
#[derive(Default)]
pub struct RecordingStore {
    documents: Vec<Document>,
    pub queries: Mutex<Vec<(String, usize)>>,
}

impl RecordingStore {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn similarity_search(&self, query: &str, k: usize) -> anyhow::Result<Vec<Document>> {
        self.queries.lock().unwrap().push((query.to_string(), k));
        Ok(self.documents.iter().take(k).cloned().collect())
    }
}

/// Web search with a fixed outcome.
pub struct FakeWebSearch {
    outcome: Result<WebSearchResults, u16>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeWebSearch {
    pub fn with_hits(hits: &[(&str, &str)]) -> Self {
        let results = hits
            .iter()
            .map(|(title, content)| SearchHit {
                title: title.to_string(),
                url: format!("https://example.com/{}", title.to_lowercase()),
                content: content.to_string(),
                published_date: None,
                score: None,
            })
            .collect();
        Self {
            outcome: Ok(WebSearchResults {
                results,
                images: Vec::new(),
            }),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::with_hits(&[])
    }

    /// Every search fails with an API error of `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            outcome: Err(status),
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WebSearch for FakeWebSearch {
    async fn search(&self, query: &str) -> Result<WebSearchResults, WebSearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.outcome {
            Ok(results) => Ok(results.clone()),
            Err(status) => Err(WebSearchError::Api {
                status: *status,
                body: "upstream unavailable".to_string(),
            }),
        }
    }
}

/// Standard toolset over the given fakes, top-3 search.
pub fn context(
    llm: Arc<ScriptedLlm>,
    store: Arc<RecordingStore>,
    web: Arc<FakeWebSearch>,
) -> AgentContext {
    AgentContext::with_backends(llm, store, web, 3)
}

pub fn customer_documents() -> Vec<Document> {
    vec![
        Document::new("Acme Corp: premium plan, renewal on 2024-09-01")
            .with_metadata(json!({"customer_id": 17})),
        Document::new("Globex: basic plan, support contact Hank"),
        Document::new("Initech: trial ended"),
        Document::new("Umbrella: enterprise plan"),
    ]
}

/// Bag-of-words embedding over the customer vocabulary.
pub struct KeywordEmbedding;

const VOCAB: [&str; 6] = ["acme", "globex", "initech", "umbrella", "plan", "support"];

fn embed_keywords(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    VOCAB
        .iter()
        .map(|w| lower.matches(w).count() as f32)
        .collect()
}

#[async_trait]
impl EmbeddingService for KeywordEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Ok(embed_keywords(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        Ok(texts.iter().map(|t| embed_keywords(t)).collect())
    }
}

/// [`customer_documents`] embedded into an in-memory store.
pub async fn ranked_store() -> Arc<InMemoryDocumentStore> {
    let store = InMemoryDocumentStore::new(Arc::new(KeywordEmbedding));
    store.add_documents(customer_documents()).await.unwrap();
    Arc::new(store)
}
