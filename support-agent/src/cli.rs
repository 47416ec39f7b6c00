//! CLI for the support-agent binary. See `main.rs` for dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "support-agent")]
#[command(about = "Customer-support chat agent over the customer documents and the company website")]
#[command(version)]
pub struct Cli {
    /// Defaults to `chat` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat. Optional first message; then stdin line by line. Exit with quit, exit or q.
    Chat(ChatArgs),

    /// Print resolved configuration (keys masked) and the bound tools.
    Info,

    /// Print a saved thread, or list all threads when no thread id is given.
    Memory {
        /// Thread to print.
        #[arg(short, long)]
        thread_id: Option<String>,

        /// Sqlite checkpoint database.
        #[arg(short = 'd', long)]
        checkpoint_db: PathBuf,
    },
}

#[derive(Args, Default)]
pub struct ChatArgs {
    /// Optional first message.
    #[arg(value_name = "MESSAGE")]
    pub message: Option<String>,

    /// Conversation thread. Defaults to THREAD_ID from env, else 42.
    #[arg(short, long)]
    pub thread_id: Option<String>,

    /// Persist threads in this Sqlite file instead of memory.
    #[arg(short = 'd', long)]
    pub checkpoint_db: Option<PathBuf>,

    /// Debug logging, mirrored to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["support-agent"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn chat_flags() {
        let cli = Cli::try_parse_from([
            "support-agent",
            "chat",
            "hello",
            "--thread-id",
            "7",
            "--checkpoint-db",
            "threads.db",
            "-v",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Chat(args)) => {
                assert_eq!(args.message.as_deref(), Some("hello"));
                assert_eq!(args.thread_id.as_deref(), Some("7"));
                assert_eq!(args.checkpoint_db, Some(PathBuf::from("threads.db")));
                assert!(args.verbose);
            }
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn memory_requires_db() {
        assert!(Cli::try_parse_from(["support-agent", "memory"]).is_err());
    }
}
