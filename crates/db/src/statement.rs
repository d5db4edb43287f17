//! Parameterized statements and the dialects they are rendered for.
//!
//! Statements are assembled with `sea-query` builders and rendered into SQL
//! text plus an ordered list of bind values. Caller input only ever travels
//! as a bind value.

use sea_query::{Iden, MysqlQueryBuilder, QueryStatementWriter, SqliteQueryBuilder, Values};

/// Identifiers of the `brands` table.
#[derive(Iden, Debug, Clone, Copy)]
pub enum Brands {
    Table,
    Id,
    OriginalName,
    MappedName,
}

/// SQL flavour a statement is rendered for.
///
/// Both dialects use `?` placeholders; they differ in identifier quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    /// Infer the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split(':').next()?.to_ascii_lowercase();
        match scheme.as_str() {
            "mysql" | "mariadb" => Some(Self::MySql),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Render a builder into SQL text and its bind values.
    pub fn render<S: QueryStatementWriter>(self, stmt: &S) -> Statement {
        let (sql, values) = match self {
            Self::MySql => stmt.build(MysqlQueryBuilder),
            Self::Sqlite => stmt.build(SqliteQueryBuilder),
        };
        Statement { sql, values }
    }
}

/// A rendered statement ready to hand to a [`StorageHandle`](crate::StorageHandle).
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub values: Values,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_query::{Expr, Query, Value};

    #[test]
    fn dialect_is_inferred_from_url_scheme() {
        assert_eq!(Dialect::from_url("mysql://root:pw@127.0.0.1:3306/whiskydb"), Some(Dialect::MySql));
        assert_eq!(Dialect::from_url("mariadb://localhost/db"), Some(Dialect::MySql));
        assert_eq!(Dialect::from_url("sqlite::memory:"), Some(Dialect::Sqlite));
        assert_eq!(Dialect::from_url("SQLITE://brands.db"), Some(Dialect::Sqlite));
        assert_eq!(Dialect::from_url("postgres://localhost/db"), None);
        assert_eq!(Dialect::from_url(""), None);
    }

    #[test]
    fn caller_input_is_bound_not_inlined() {
        let hostile = "x' OR '1'='1";
        let delete = Query::delete()
            .from_table(Brands::Table)
            .and_where(Expr::col(Brands::OriginalName).eq(hostile))
            .to_owned();

        let stmt = Dialect::MySql.render(&delete);
        assert_eq!(stmt.sql, "DELETE FROM `brands` WHERE `original_name` = ?");
        assert!(!stmt.sql.contains(hostile));
        assert_eq!(stmt.values.0, vec![Value::from(hostile)]);
    }

    #[test]
    fn sqlite_quotes_identifiers_with_double_quotes() {
        let delete = Query::delete()
            .from_table(Brands::Table)
            .and_where(Expr::col(Brands::OriginalName).eq("x"))
            .to_owned();

        let stmt = Dialect::Sqlite.render(&delete);
        assert_eq!(stmt.sql, r#"DELETE FROM "brands" WHERE "original_name" = ?"#);
    }
}
