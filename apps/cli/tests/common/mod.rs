//! Shared test context: an in-memory database and a pinned clock.

#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use std::path::PathBuf;
use std::sync::Arc;

use vocab_core::{FixedClock, ReviewIntervals, ReviewMode};
use vocab_review::config::Config;
use vocab_review::db::SqliteCardStore;
use vocab_review::state::AppState;

pub struct TestContext {
    pub state: AppState,
    pub clock: Arc<FixedClock>,
}

impl TestContext {
    /// Context whose clock reads 2024-01-10 09:00 UTC.
    pub fn new() -> Self {
        Self::at(2024, 1, 10)
    }

    pub fn at(year: i32, month: u32, day: u32) -> Self {
        let store = SqliteCardStore::open_in_memory().expect("in-memory database");
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap(),
        ));
        let config = Config {
            db_path: PathBuf::from(":memory:"),
            intervals: ReviewIntervals::default(),
            mode: ReviewMode::Srs,
        };
        let state = AppState::with_clock(store, config, clock.clone());
        Self { state, clock }
    }

    /// Move the clock to 09:00 UTC on the given date.
    pub fn set_date(&self, year: i32, month: u32, day: u32) {
        self.clock
            .set(Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap());
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Scripted key input, one entry per line.
pub fn keys(lines: &[&str]) -> std::io::Cursor<Vec<u8>> {
    let mut script = String::new();
    for line in lines {
        script.push_str(line);
        script.push('\n');
    }
    std::io::Cursor::new(script.into_bytes())
}
