//! Database error types.

use thiserror::Error;
use vocab_core::StoreError;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("review history encoding: {0}")]
    Json(#[from] serde_json::Error),

    #[error("card not found: {0}")]
    CardNotFound(String),

    #[error("card already exists: {0}")]
    DuplicateCard(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::CardNotFound(id) => StoreError::NotFound(id),
            DbError::DuplicateCard(id) => StoreError::Duplicate(id),
            other => StoreError::Backend(other.to_string()),
        }
    }
}
