use super::commands::{Command, is_command_line, parse_command};
use crate::chat::ChatSession;
use crate::llm::provider::LlmProvider;
use anyhow::{Context, Result, anyhow};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const INPUT_PROMPT: &str = "Input: ";
pub const FILE_NOT_FOUND: &str = "File not found. ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Sends one message and prints the reply after a blank line.
pub async fn send_and_print<P: LlmProvider, W: Write>(
    session: &mut ChatSession<P>,
    message: &str,
    out: &mut W,
) -> Result<()> {
    let reply = session
        .send_message(message)
        .await
        .context("Failed to get a response from the model")?;
    writeln!(out, "\n{reply}")?;
    out.flush()?;
    Ok(())
}

/// Read-send-print loop. Ends on `/exit` or end of input; any send failure is returned.
pub async fn run_repl<P, R, W>(session: &mut ChatSession<P>, input: R, out: &mut W) -> Result<()>
where
    P: LlmProvider,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{INPUT_PROMPT}")?;
        out.flush()?;

        let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read input line")?
        else {
            break;
        };

        if handle_line(session, &line, out).await? == Flow::Exit {
            break;
        }
    }

    Ok(())
}

async fn handle_line<P: LlmProvider, W: Write>(
    session: &mut ChatSession<P>,
    line: &str,
    out: &mut W,
) -> Result<Flow> {
    if !is_command_line(line) {
        send_and_print(session, line, out).await?;
        return Ok(Flow::Continue);
    }

    match parse_command(line) {
        Command::Exit => return Ok(Flow::Exit),
        Command::File { path: Some(path) } => match read_message_file(Path::new(&path))? {
            Some(content) => send_and_print(session, &content, out).await?,
            None => {
                writeln!(out, "{FILE_NOT_FOUND}")?;
                out.flush()?;
            }
        },
        Command::File { path: None } | Command::Unrecognized { .. } => {}
    }

    Ok(Flow::Continue)
}

fn read_message_file(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(anyhow!("Failed to read file {}: {err}", path.display())),
    }
}
