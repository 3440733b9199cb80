//! Command handlers.

pub mod cards;
pub mod review;

use crate::cli::Command;
use crate::state::AppState;
use anyhow::Result;
use std::io::{BufRead, Write};

/// Run one CLI command against the app state.
pub async fn dispatch<I, W>(state: &AppState, command: Command, input: I, out: &mut W) -> Result<()>
where
    I: BufRead,
    W: Write,
{
    match command {
        Command::Add {
            word,
            meaning,
            status,
        } => {
            cards::add(state, &word, &meaning, status, out).await?;
        }
        Command::List { due } => cards::list(state, due, out).await?,
        Command::SetStatus { id, status } => {
            cards::set_status(state, &id, status, out).await?;
        }
        Command::Remove { id } => cards::remove(state, &id, out).await?,
        Command::Stats => {
            cards::stats(state, out).await?;
        }
        Command::Review { practice, seed } => {
            review::review(state, practice, seed, input, out).await?;
        }
    }
    Ok(())
}
