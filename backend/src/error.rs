//! Error types shared across the registry layers.

use thiserror::Error;

use crate::domain::UserId;

/// Failures raised by a [`UserStore`](crate::application::ports::UserStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The row was resolved but had disappeared when the write landed.
    #[error("user {0} disappeared before the write completed")]
    RowMissing(UserId),

    #[error("stored user row is malformed: {0}")]
    Corrupt(String),
}

/// Outcome of a directory operation that did not produce a row.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("User not found")]
    NotFound,

    #[error("{0}")]
    InvalidInput(String),

    #[error("generated identity was rejected: {0}")]
    Identity(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DirectoryError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Startup configuration problems. Any of these stops the process before
/// it binds a port.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("{key} is required")]
    Missing { key: &'static str },

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}
