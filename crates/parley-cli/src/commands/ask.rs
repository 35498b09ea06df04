//! `parley ask`: one turn, reply on stdout

use anyhow::{bail, Result};
use parley_client::{ChatSession, TurnOutcome};
use parley_config::Config;
use parley_core::Role;

pub async fn execute(config: &Config, text: &str) -> Result<()> {
    let session = ChatSession::connect(&config.client);

    match session.submit(text).await? {
        TurnOutcome::Completed { reply } => {
            if let Some(reply) = reply {
                println!("{reply}");
            }
            if let Some(error) = session.snapshot().last_error {
                bail!("reply ended early: {error}");
            }
            Ok(())
        }
        TurnOutcome::Failed(error) => {
            let snapshot = session.snapshot();
            if let Some(partial) = snapshot.transcript.last().filter(|m| m.role() == Role::Assistant) {
                println!("{}", partial.content());
            }
            Err(error.into())
        }
        TurnOutcome::Cancelled => bail!("cancelled"),
    }
}
