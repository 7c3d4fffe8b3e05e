//! Error types for tenant seeding.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur while seeding a tenant.
#[derive(Debug, Error)]
pub enum SeedError {
    /// IO error (file read).
    #[error("IO error: {0}")]
    Io(String),

    /// The document is not valid JSON or does not match the seed format.
    #[error("invalid seed document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but failed validation.
    #[error("{} validation errors found", .0.len())]
    Invalid(Vec<String>),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
