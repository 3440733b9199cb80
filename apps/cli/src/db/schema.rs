//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the local card database.
///
/// Dates are stored as `YYYY-MM-DD` text so that due-date comparisons work
/// on plain string ordering. Review history is a JSON array.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cards (
    id TEXT PRIMARY KEY,
    word TEXT NOT NULL,
    meaning TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    last_reviewed_at TEXT,
    due_date TEXT,
    review_status INTEGER NOT NULL DEFAULT 1 CHECK (review_status BETWEEN 1 AND 5),
    review_history TEXT NOT NULL DEFAULT '[]'
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

CREATE INDEX IF NOT EXISTS idx_cards_due ON cards(due_date);
"#;
