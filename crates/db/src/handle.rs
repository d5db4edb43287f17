//! The `StorageHandle` trait — the capability a store executes statements
//! through.

use async_trait::async_trait;
use sqlx::any::AnyRow;

use crate::{DbError, Dialect, Statement};

/// Executes rendered statements against a relational backend.
///
/// Implementations own connection management (pooling included) and must be
/// safe to share between concurrent callers.
#[async_trait]
pub trait StorageHandle: Send + Sync {
    /// Dialect statements must be rendered in for this backend.
    fn dialect(&self) -> Dialect;

    /// Run a statement that returns no rows and report the affected-row count.
    async fn execute(&self, stmt: &Statement) -> Result<u64, DbError>;

    /// Run a query and return its first row, if any.
    async fn fetch_optional(&self, stmt: &Statement) -> Result<Option<AnyRow>, DbError>;
}
