//! Error types for vocab-core.

use thiserror::Error;

/// Errors raised by the due date calculator and the status ladder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid review status: {0} (expected 1-5)")]
    InvalidStatus(i64),

    #[error("invalid reference date: {0:?}")]
    InvalidReferenceDate(String),

    #[error("invalid review intervals: {0}")]
    InvalidIntervals(String),
}

/// Errors raised while creating or editing cards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("word must not be empty")]
    EmptyWord,

    #[error("known cards cannot be moved back onto the review ladder")]
    KnownIsTerminal,
}

/// Errors reported by a card store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("card not found: {0}")]
    NotFound(String),

    #[error("card already exists: {0}")]
    Duplicate(String),

    #[error("storage backend failed: {0}")]
    Backend(String),
}

/// Errors returned by review session commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

/// Result type alias using ScheduleError.
pub type Result<T> = std::result::Result<T, ScheduleError>;
