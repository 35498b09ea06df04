//! `parley chat`: interactive terminal chat
//!
//! Replies are printed as they stream in, by diffing each snapshot's
//! in-progress message against what was already written.

use anyhow::Result;
use parley_client::{ChatSession, HttpRelay, TurnOutcome};
use parley_config::Config;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const QUIT_COMMANDS: &[&str] = &["/quit", "/exit"];

pub async fn execute(config: &Config) -> Result<()> {
    let session = ChatSession::connect(&config.client);
    tracing::debug!("Chatting with relay at {}", config.client.relay_url);

    println!("Ask anything about the SDE Abroad masterclass. Type /quit to leave.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if QUIT_COMMANDS.contains(&line) {
            break;
        }
        if line.is_empty() {
            continue;
        }

        if matches!(run_turn(&session, line).await?, TurnOutcome::Cancelled) {
            break;
        }
    }

    session.close();
    Ok(())
}

fn prompt() -> Result<()> {
    let mut out = std::io::stdout();
    write!(out, "\n> ")?;
    out.flush()?;
    Ok(())
}

/// Submit one line, echoing the reply as it grows; Ctrl-C closes the session
async fn run_turn(session: &ChatSession<HttpRelay>, text: &str) -> Result<TurnOutcome> {
    let mut updates = session.subscribe();
    let turn = session.submit(text);
    tokio::pin!(turn);

    let mut printed = 0usize;
    let mut out = std::io::stdout();

    let outcome = loop {
        tokio::select! {
            outcome = &mut turn => break outcome?,
            changed = updates.changed() => {
                if changed.is_err() {
                    continue;
                }
                let snapshot = updates.borrow_and_update().clone();
                if let Some(reply) = snapshot.transcript.in_progress() {
                    printed = write_new(&mut out, reply.content(), printed)?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                session.close();
            }
        }
    };

    match &outcome {
        TurnOutcome::Completed { reply } => {
            if let Some(reply) = reply {
                write_new(&mut out, reply, printed)?;
            }
            writeln!(out)?;
            if let Some(error) = session.snapshot().last_error {
                eprintln!("[reply ended early: {error}]");
            }
        }
        TurnOutcome::Failed(error) => {
            if printed > 0 {
                writeln!(out)?;
            }
            eprintln!("[error: {error}]");
        }
        TurnOutcome::Cancelled => writeln!(out)?,
    }

    Ok(outcome)
}

/// Write the part of `content` past `printed`, returning the new offset
fn write_new(out: &mut impl Write, content: &str, printed: usize) -> Result<usize> {
    if let Some(rest) = content.get(printed..) {
        out.write_all(rest.as_bytes())?;
        out.flush()?;
    }
    Ok(content.len().max(printed))
}
