pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod state;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::config::Config;
use crate::db::SqliteCardStore;
use crate::state::AppState;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the review prompt.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(raw) = cli.intervals {
        config.intervals = raw
            .parse()
            .with_context(|| format!("invalid --intervals: {raw:?}"))?;
    }

    // Ensure data directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }

    tracing::info!(path = %config.db_path.display(), intervals = %config.intervals, "opening card database");
    let store = SqliteCardStore::open(&config.db_path)
        .with_context(|| format!("cannot open {}", config.db_path.display()))?;
    let state = AppState::new(store, config);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::dispatch(&state, cli.command, stdin.lock(), &mut out).await
}
