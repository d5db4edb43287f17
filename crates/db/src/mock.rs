//! `MockHandle` — a test double for `StorageHandle`.
//!
//! Records every statement it receives and answers with scripted outcomes,
//! so store logic can be checked without a database.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::any::AnyRow;

use crate::{DbError, Dialect, Statement, StorageHandle};

/// What the mock does for the next call.
pub enum MockOutcome {
    /// `execute` reports this many affected rows; `fetch_optional` finds nothing.
    Affected(u64),
    /// Fail with a storage error carrying this message.
    Fail(String),
}

/// A recorded call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub sql: String,
    pub values: Vec<sea_query::Value>,
}

/// A handle that never touches a database.
///
/// With an empty script every `execute` affects one row and every
/// `fetch_optional` returns no row.
pub struct MockHandle {
    dialect: Dialect,
    script: Mutex<VecDeque<MockOutcome>>,
    /// All statements seen by this handle (in call order).
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockHandle {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            script: Mutex::new(VecDeque::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue the outcome of a future call.
    pub fn then(self, outcome: MockOutcome) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    /// Number of statements received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, stmt: &Statement) -> Option<MockOutcome> {
        self.calls.lock().unwrap().push(RecordedCall {
            sql: stmt.sql.clone(),
            values: stmt.values.0.clone(),
        });
        self.script.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl StorageHandle for MockHandle {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn execute(&self, stmt: &Statement) -> Result<u64, DbError> {
        match self.record(stmt) {
            None => Ok(1),
            Some(MockOutcome::Affected(n)) => Ok(n),
            Some(MockOutcome::Fail(msg)) => Err(DbError::Storage(sqlx::Error::Protocol(msg))),
        }
    }

    async fn fetch_optional(&self, stmt: &Statement) -> Result<Option<AnyRow>, DbError> {
        match self.record(stmt) {
            None | Some(MockOutcome::Affected(_)) => Ok(None),
            Some(MockOutcome::Fail(msg)) => Err(DbError::Storage(sqlx::Error::Protocol(msg))),
        }
    }
}
