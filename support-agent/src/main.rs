//! Binary for support-agent: interactive chat, config info, saved-thread inspection.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use embedding::EmbeddingConfig;
use llm_client::EnvLlmConfig;
use openai_client::mask_token;
use support_agent::config::DEFAULT_LOG_FILE;
use support_agent::tools::{
    SEARCH_TOOL_DESCRIPTION, SEARCH_TOOL_NAME, WEB_SEARCH_TOOL_DESCRIPTION, WEB_SEARCH_TOOL_NAME,
};
use support_agent::{
    format_thread_summary, run_chat_loop, AgentContext, AgentRunner, AppConfig, Checkpointer,
    MemorySaver, SqliteSaver,
};
use tracing::info;

mod cli;

use cli::{ChatArgs, Cli, Commands};

fn log_file_from_env() -> PathBuf {
    std::env::var("LOG_FILE")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

fn open_checkpointer(db: Option<&Path>) -> Result<Arc<dyn Checkpointer>> {
    Ok(match db {
        Some(path) => Arc::new(SqliteSaver::open(path)?),
        None => Arc::new(MemorySaver::new()),
    })
}

/// Loads every config (fatal on missing values), connects the backends and runs the chat loop.
async fn run_chat(args: ChatArgs) -> Result<()> {
    let app = AppConfig::from_env().context("load configuration")?;
    let llm_config = EnvLlmConfig::from_env().context("load LLM configuration")?;
    let embedding_config = EmbeddingConfig::from_env().context("load embedding configuration")?;

    agent_core::init_tracing(&app.log_file, args.verbose)?;
    info!(
        model = %llm_config.llm_model,
        api_key = %mask_token(&llm_config.openai_api_key),
        "starting support agent"
    );

    let ctx = AgentContext::connect(&app, &llm_config, &embedding_config).await?;
    let checkpointer = open_checkpointer(args.checkpoint_db.as_deref())?;
    let runner = AgentRunner::new(ctx, checkpointer);
    let thread_id = args.thread_id.unwrap_or_else(|| app.thread_id.clone());

    run_chat_loop(
        &runner,
        &thread_id,
        args.message,
        io::stdin().lock(),
        io::stdout(),
    )
    .await
}

fn print_info() -> Result<()> {
    let app = AppConfig::from_env().context("load configuration")?;
    let llm_config = EnvLlmConfig::from_env().context("load LLM configuration")?;
    let embedding_config = EmbeddingConfig::from_env().context("load embedding configuration")?;

    println!("LLM:");
    println!("  model:          {}", llm_config.llm_model);
    println!("  base url:       {}", llm_config.openai_base_url);
    println!("  api key:        {}", mask_token(&llm_config.openai_api_key));
    println!(
        "  system prompt:  {}",
        if llm_config.llm_system_prompt.is_some() { "set" } else { "-" }
    );
    println!("Embeddings:");
    println!("  model:          {}", embedding_config.model);
    println!("Document store:");
    println!("  collection:     {}", app.collection);
    println!("  top k:          {}", app.search_top_k);
    println!("Web search:");
    println!("  domain:         {}", app.company_domain);
    println!("  max results:    {}", app.web_search_max_results);
    println!("  timeout:        {}s", app.web_search_timeout.as_secs());
    println!("  api key:        {}", mask_token(&app.tavily_api_key));
    println!("Agent:");
    println!("  max steps:      {}", app.max_agent_steps);
    println!("  thread id:      {}", app.thread_id);
    println!("  log file:       {}", app.log_file.display());
    println!("Tools:");
    println!("  {}: {}", SEARCH_TOOL_NAME, SEARCH_TOOL_DESCRIPTION);
    println!("  {}: {}", WEB_SEARCH_TOOL_NAME, WEB_SEARCH_TOOL_DESCRIPTION);
    Ok(())
}

/// Prints one thread, or every thread in `db`.
async fn print_memory(db: &Path, thread_id: Option<&str>) -> Result<()> {
    let saver = SqliteSaver::open_existing(db)?;
    println!("Checkpoints: {}", db.display());
    let ids = match thread_id {
        Some(id) => vec![id.to_string()],
        None => saver.list_threads().await?,
    };
    if ids.is_empty() {
        println!("  (no threads)");
        return Ok(());
    }
    for id in &ids {
        match saver.load(id).await? {
            Some(conversation) => println!("{}", format_thread_summary(&conversation)),
            None => println!("Thread {}: (empty)", id),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Chat(ChatArgs::default())) {
        Commands::Chat(args) => run_chat(args).await?,
        Commands::Info => print_info()?,
        Commands::Memory {
            thread_id,
            checkpoint_db,
        } => {
            agent_core::init_tracing(&log_file_from_env(), false)?;
            print_memory(&checkpoint_db, thread_id.as_deref()).await?;
        }
    }
    Ok(())
}
