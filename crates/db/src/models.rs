//! Row structs that map onto the `brands` table.

use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};

/// A persisted brand row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    /// Assigned by the engine on insert.
    pub id: i64,
    /// Natural key; every lookup, update and delete goes through it.
    pub original_name: String,
    /// Display name associated with `original_name`.
    pub mapped_name: String,
}

impl<'r> FromRow<'r, AnyRow> for Brand {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            original_name: text_column(row, "original_name")?,
            mapped_name: text_column(row, "mapped_name")?,
        })
    }
}

/// Decode a character column that may arrive as text or as bytes.
///
/// MySQL reports `TEXT` columns with the `BLOB` type code, which the `Any`
/// driver surfaces as a blob value.
fn text_column(row: &AnyRow, column: &str) -> Result<String, sqlx::Error> {
    match row.try_get::<String, _>(column) {
        Ok(text) => Ok(text),
        Err(text_err) => {
            let bytes: Vec<u8> = row.try_get(column).map_err(|_| text_err)?;
            String::from_utf8(bytes).map_err(|e| sqlx::Error::ColumnDecode {
                index: format!("{column:?}"),
                source: Box::new(e),
            })
        }
    }
}

/// Input for an insert. Carries no id: the engine assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBrand {
    pub original_name: String,
    pub mapped_name: String,
}

impl NewBrand {
    pub fn new(original_name: impl Into<String>, mapped_name: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            mapped_name: mapped_name.into(),
        }
    }
}

/// Drops the id; an insert never supplies one.
impl From<Brand> for NewBrand {
    fn from(brand: Brand) -> Self {
        Self {
            original_name: brand.original_name,
            mapped_name: brand.mapped_name,
        }
    }
}
