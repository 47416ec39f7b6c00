use thiserror::Error;

/// Startup configuration failures. Fatal: the CLI never reaches the input loop.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Errors that abort a single conversation turn.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model call failed: {0}")]
    Llm(#[source] anyhow::Error),

    #[error("Tool `{name}` failed: {source}")]
    Tool {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Model requested unknown tool `{0}`")]
    UnknownTool(String),

    #[error("Invalid arguments for tool `{name}`: {reason}")]
    InvalidToolArguments { name: String, reason: String },

    #[error("Structured reply error: {0}")]
    Formatter(String),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[source] anyhow::Error),

    #[error("Agent step limit of {0} reached without a final answer")]
    StepLimitExceeded(usize),
}

pub type Result<T> = std::result::Result<T, AgentError>;
