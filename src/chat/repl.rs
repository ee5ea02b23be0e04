// src/chat/repl.rs

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::debug;

use crate::chat::{ChatService, ChatTurn};

/// Input line that terminates the session.
pub const EXIT_SENTINEL: &str = "exit";

const PROMPT: &str = "Enter your message: ";

/// Run the interactive chat loop until EOF or the exit sentinel.
///
/// Each turn: prompt, read one line, stream the reply fragment by fragment
/// (flushing after each so output appears as it arrives), then append both
/// the user message and the assembled reply to the history passed to the
/// next turn. Returns the accumulated history.
pub fn run_repl<S, R, W>(service: &mut S, mut input: R, mut output: W) -> Result<Vec<ChatTurn>>
where
    S: ChatService,
    R: BufRead,
    W: Write,
{
    let mut history: Vec<ChatTurn> = Vec::new();

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        let n = input.read_line(&mut line).context("reading chat input")?;
        if n == 0 {
            debug!("end of input");
            break;
        }
        let message = line.trim();

        if message == EXIT_SENTINEL {
            debug!("exit sentinel received");
            break;
        }
        if message.is_empty() {
            continue;
        }

        let stream = service.stream_reply(message, &history)?;
        history.push(ChatTurn::user(message));

        let mut full_reply = String::new();
        for fragment in stream {
            let fragment = fragment.context("reading reply fragment")?;
            write!(output, "{fragment}")?;
            output.flush()?;
            full_reply.push_str(&fragment);
        }
        writeln!(output)?;
        writeln!(output)?;

        history.push(ChatTurn::assistant(full_reply));
    }

    Ok(history)
}
