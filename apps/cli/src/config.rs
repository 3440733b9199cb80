//! Runtime configuration from the environment.

use anyhow::{Context, Result};
use std::path::PathBuf;
use vocab_core::{ReviewIntervals, ReviewMode};

pub const DB_PATH_VAR: &str = "VOCAB_DB_PATH";
pub const INTERVALS_VAR: &str = "VOCAB_INTERVALS";
pub const MODE_VAR: &str = "VOCAB_MODE";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub intervals: ReviewIntervals,
    pub mode: ReviewMode,
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup(DB_PATH_VAR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let intervals = match lookup(INTERVALS_VAR) {
            Some(raw) => raw
                .parse::<ReviewIntervals>()
                .with_context(|| format!("invalid {INTERVALS_VAR}: {raw:?}"))?,
            None => ReviewIntervals::default(),
        };

        let mode = match lookup(MODE_VAR) {
            Some(raw) => raw
                .parse::<ReviewMode>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid {MODE_VAR}"))?,
            None => ReviewMode::default(),
        };

        Ok(Self {
            db_path,
            intervals,
            mode,
        })
    }
}

fn default_db_path() -> PathBuf {
    // Use app data directory for production, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-review")
        .join("cards.db")
}
