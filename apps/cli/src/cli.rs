//! Command-line interface definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vocab_core::ReviewStatus;

#[derive(Debug, Parser)]
#[command(name = "vocab-review", about = "Vocabulary flashcards with spaced repetition", version)]
pub struct Cli {
    /// Card database file (overrides VOCAB_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Comma-separated review intervals in days (overrides VOCAB_INTERVALS)
    #[arg(long, global = true)]
    pub intervals: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a card
    Add {
        word: String,
        meaning: String,
        /// Initial status: 1 new, 2 3-day, 3 7-day, 4 15-day, 5 known
        #[arg(long, default_value = "1", value_parser = parse_status)]
        status: ReviewStatus,
    },

    /// List cards
    List {
        /// Only cards due today
        #[arg(long)]
        due: bool,
    },

    /// Move a card to another status
    SetStatus {
        id: String,
        #[arg(value_parser = parse_status)]
        status: ReviewStatus,
    },

    /// Delete a card
    Remove { id: String },

    /// Show deck statistics
    Stats,

    /// Review due cards
    Review {
        /// Practice every card still being learned without rescheduling
        #[arg(long)]
        practice: bool,
        /// Seed for the card order
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub fn parse_status(s: &str) -> Result<ReviewStatus, String> {
    let value: u8 = s.trim().parse().map_err(|_| format!("not a status number: {s}"))?;
    ReviewStatus::try_from(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_review_flags() {
        let cli = Cli::try_parse_from(["vocab-review", "review", "--practice", "--seed", "7"]).unwrap();
        match cli.command {
            Command::Review { practice, seed } => {
                assert!(practice);
                assert_eq!(seed, Some(7));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn status_argument_is_validated() {
        assert_eq!(parse_status("4"), Ok(ReviewStatus::FifteenDay));
        assert!(parse_status("0").is_err());
        assert!(parse_status("known").is_err());
        assert!(Cli::try_parse_from(["vocab-review", "add", "a", "b", "--status", "6"]).is_err());
    }
}
