//! sqlx-backed storage handle.

use async_trait::async_trait;
use sea_query::Value;
use sqlx::any::{install_default_drivers, AnyArguments, AnyPoolOptions, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Connection};
use tracing::{debug, info};

use crate::{DbConfig, DbError, Dialect, Statement, StorageHandle};

type AnyQuery<'q> = Query<'q, Any, AnyArguments<'q>>;

/// A connection pool paired with the dialect its statements are rendered in.
///
/// Cloning is cheap: clones share the same pool.
#[derive(Debug, Clone)]
pub struct SqlHandle {
    pool: AnyPool,
    dialect: Dialect,
}

impl SqlHandle {
    /// Open a pool for `config.database_url`.
    ///
    /// The URL scheme picks the dialect; `mysql://`, `mariadb://` and
    /// `sqlite:` are understood.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let dialect = Dialect::from_url(&config.database_url).ok_or_else(|| {
            let scheme = config.database_url.split(':').next().unwrap_or_default();
            sqlx::Error::Configuration(format!("unsupported database url scheme '{scheme}'").into())
        })?;

        install_default_drivers();
        info!(
            "Connecting to database (dialect={:?}, max_connections={})",
            dialect, config.max_connections
        );
        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool, dialect })
    }

    /// Wrap an already-open pool.
    pub fn from_pool(pool: AnyPool, dialect: Dialect) -> Self {
        Self { pool, dialect }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Round-trip to the server to confirm the connection is usable.
    pub async fn ping(&self) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await?;
        Ok(())
    }

    /// Close every pooled connection; later calls fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl StorageHandle for SqlHandle {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn execute(&self, stmt: &Statement) -> Result<u64, DbError> {
        debug!(sql = %stmt.sql, "execute");
        let result = bind_all(sqlx::query(&stmt.sql), stmt)?
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn fetch_optional(&self, stmt: &Statement) -> Result<Option<AnyRow>, DbError> {
        debug!(sql = %stmt.sql, "fetch_optional");
        let row = bind_all(sqlx::query(&stmt.sql), stmt)?
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

fn bind_all<'q>(mut query: AnyQuery<'q>, stmt: &Statement) -> Result<AnyQuery<'q>, DbError> {
    for value in stmt.values.0.iter() {
        query = bind_value(query, value)?;
    }
    Ok(query)
}

/// Bind one sea-query value positionally.
///
/// The `Any` driver has no unsigned 64-bit type, so `BigUnsigned` must fit in
/// an `i64`.
fn bind_value<'q>(query: AnyQuery<'q>, value: &Value) -> Result<AnyQuery<'q>, DbError> {
    let query = match value {
        Value::Bool(v) => query.bind(*v),
        Value::TinyInt(v) => query.bind(v.map(i16::from)),
        Value::SmallInt(v) => query.bind(*v),
        Value::Int(v) => query.bind(*v),
        Value::BigInt(v) => query.bind(*v),
        Value::TinyUnsigned(v) => query.bind(v.map(i16::from)),
        Value::SmallUnsigned(v) => query.bind(v.map(i32::from)),
        Value::Unsigned(v) => query.bind(v.map(i64::from)),
        Value::BigUnsigned(v) => {
            let v = v
                .map(i64::try_from)
                .transpose()
                .map_err(|_| DbError::QueryBuild(format!("unsigned value {v:?} overflows i64")))?;
            query.bind(v)
        }
        Value::Float(v) => query.bind(*v),
        Value::Double(v) => query.bind(*v),
        Value::String(v) => query.bind(v.as_ref().map(|s| s.to_string())),
        Value::Char(v) => query.bind(v.map(String::from)),
        Value::Bytes(v) => query.bind(v.as_ref().map(|b| b.to_vec())),
        #[allow(unreachable_patterns)]
        other => {
            return Err(DbError::QueryBuild(format!(
                "value kind not supported by the any driver: {other:?}"
            )))
        }
    };
    Ok(query)
}
