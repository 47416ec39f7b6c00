//! Interactive chat loop.
//!
//! Reads one line at a time, runs a turn per non-empty line and prints the structured reply.
//! `quit`, `exit` or `q` (any case) and EOF end the loop; a failed turn prints the error and
//! the loop continues.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::error;

use crate::runner::AgentRunner;

const EXIT_COMMANDS: [&str; 3] = ["quit", "exit", "q"];

pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    EXIT_COMMANDS.iter().any(|c| line.eq_ignore_ascii_case(c))
}

/// Runs one turn and prints its outcome to `output`.
pub async fn chat_once<W: Write>(
    runner: &AgentRunner,
    thread_id: &str,
    input: &str,
    output: &mut W,
) -> Result<()> {
    match runner.run_turn(thread_id, input).await {
        Ok(reply) => writeln!(output, "Assistant: {}", reply)?,
        Err(e) => {
            error!(thread_id, error = %e, "turn failed");
            writeln!(output, "Error: {}", e)?;
        }
    }
    Ok(())
}

/// Prompt loop over `input`/`output`; `first_message`, if any, runs before the first prompt.
pub async fn run_chat_loop<R: BufRead, W: Write>(
    runner: &AgentRunner,
    thread_id: &str,
    first_message: Option<String>,
    mut input: R,
    mut output: W,
) -> Result<()> {
    writeln!(output, "Support chat (thread {}). Type quit, exit or q to leave.", thread_id)?;

    if let Some(message) = first_message.filter(|m| !m.trim().is_empty()) {
        if is_exit_command(&message) {
            writeln!(output, "Goodbye!")?;
            return Ok(());
        }
        writeln!(output, "User: {}", message.trim())?;
        chat_once(runner, thread_id, message.trim(), &mut output).await?;
    }

    loop {
        write!(output, "User: ")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_exit_command(line) {
            writeln!(output, "Goodbye!")?;
            break;
        }
        chat_once(runner, thread_id, line, &mut output).await?;
    }
    Ok(())
}
