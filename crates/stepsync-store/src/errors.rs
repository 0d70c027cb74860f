//! Error types for the store.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// JSON serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which migration failed and why.
        message: String,
    },

    /// Requested user was not found.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Requested practice session was not found.
    #[error("practice session not found: {0}")]
    SessionNotFound(String),

    /// Requested challenge was not found.
    #[error("challenge not found: {0}")]
    ChallengeNotFound(String),

    /// A stored value could not be interpreted (e.g. an unknown enum tag).
    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
