//! Typed error type for the db crate.

use thiserror::Error;

/// Every failure a store operation can report.
///
/// `NotFound` is a normal business outcome; `QueryBuild` and `Storage` are
/// operational failures.
#[derive(Debug, Error)]
pub enum DbError {
    /// The statement could not be rendered or its arguments could not be bound.
    #[error("failed to build query: {0}")]
    QueryBuild(String),

    /// The engine rejected or failed to run a statement (constraint
    /// violations, lost connections, row decoding).
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A lookup by `original_name` matched no row.
    #[error("no brand with original_name '{original_name}'")]
    NotFound { original_name: String },
}

impl DbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<sea_query::error::Error> for DbError {
    fn from(err: sea_query::error::Error) -> Self {
        Self::QueryBuild(err.to_string())
    }
}
