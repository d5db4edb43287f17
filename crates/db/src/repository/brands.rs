//! Brand CRUD operations.
//!
//! Lookups, updates and deletes are keyed by `original_name`. Update and
//! delete do not check how many rows they touched: a call against a missing
//! key succeeds silently.

use std::sync::Arc;

use async_trait::async_trait;
use sea_query::{Expr, Query};
use sqlx::FromRow;
use tracing::{debug, info, instrument, warn};

use crate::{
    models::{Brand, NewBrand},
    statement::{Brands, Statement},
    DbError, StorageHandle,
};

/// Fixed rows inserted by [`BrandStore::seed_sample_data`].
pub const SAMPLE_BRANDS: [(&str, &str); 3] = [
    ("Marca1", "Marca Mapeada 1"),
    ("Marca2", "Marca Mapeada 2"),
    ("Marca3", "Marca Mapeada 3"),
];

/// CRUD contract over the `brands` table.
///
/// Every call is one round trip; nothing is cached or retried.
#[async_trait]
pub trait BrandRepository: Send + Sync {
    /// Insert a brand. A duplicate `original_name` surfaces as
    /// [`DbError::Storage`] with the engine's constraint error.
    async fn create(&self, brand: NewBrand) -> Result<(), DbError>;

    /// Fetch the brand stored under `original_name`.
    ///
    /// The row cap is sent as a bound parameter (`LIMIT ?` with `1`).
    async fn read(&self, original_name: &str) -> Result<Brand, DbError>;

    /// Replace the mapped name of `original_name`.
    async fn update(&self, original_name: &str, new_mapped_name: &str) -> Result<(), DbError>;

    /// Remove the brand stored under `original_name`.
    async fn delete(&self, original_name: &str) -> Result<(), DbError>;
}

/// [`BrandRepository`] backed by an injected [`StorageHandle`].
#[derive(Clone)]
pub struct BrandStore {
    handle: Arc<dyn StorageHandle>,
}

impl BrandStore {
    pub fn new(handle: Arc<dyn StorageHandle>) -> Self {
        Self { handle }
    }

    /// Insert [`SAMPLE_BRANDS`] in order, stopping at the first failure.
    ///
    /// Rows inserted before the failure stay in place.
    pub async fn seed_sample_data(&self) -> Result<(), DbError> {
        for (original_name, mapped_name) in SAMPLE_BRANDS {
            if let Err(e) = self.create(NewBrand::new(original_name, mapped_name)).await {
                warn!(original_name, "Seeding stopped: {e}");
                return Err(e);
            }
        }
        info!("Inserted {} sample brands", SAMPLE_BRANDS.len());
        Ok(())
    }

    fn insert_statement(&self, brand: &NewBrand) -> Result<Statement, DbError> {
        let mut insert = Query::insert();
        insert
            .into_table(Brands::Table)
            .columns([Brands::OriginalName, Brands::MappedName]);
        insert.values([
            brand.original_name.as_str().into(),
            brand.mapped_name.as_str().into(),
        ])?;
        Ok(self.handle.dialect().render(&insert))
    }

    fn select_statement(&self, original_name: &str) -> Statement {
        let select = Query::select()
            .columns([Brands::Id, Brands::OriginalName, Brands::MappedName])
            .from(Brands::Table)
            .and_where(Expr::col(Brands::OriginalName).eq(original_name))
            .limit(1)
            .to_owned();
        self.handle.dialect().render(&select)
    }

    fn update_statement(&self, original_name: &str, new_mapped_name: &str) -> Statement {
        let update = Query::update()
            .table(Brands::Table)
            .value(Brands::MappedName, new_mapped_name)
            .and_where(Expr::col(Brands::OriginalName).eq(original_name))
            .to_owned();
        self.handle.dialect().render(&update)
    }

    fn delete_statement(&self, original_name: &str) -> Statement {
        let delete = Query::delete()
            .from_table(Brands::Table)
            .and_where(Expr::col(Brands::OriginalName).eq(original_name))
            .to_owned();
        self.handle.dialect().render(&delete)
    }
}

#[async_trait]
impl BrandRepository for BrandStore {
    #[instrument(skip(self, brand), fields(original_name = %brand.original_name))]
    async fn create(&self, brand: NewBrand) -> Result<(), DbError> {
        let stmt = self.insert_statement(&brand)?;
        self.handle.execute(&stmt).await.map_err(|e| {
            warn!("Insert failed: {e}");
            e
        })?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn read(&self, original_name: &str) -> Result<Brand, DbError> {
        let stmt = self.select_statement(original_name);
        let row = self
            .handle
            .fetch_optional(&stmt)
            .await
            .map_err(|e| {
                warn!("Select failed: {e}");
                e
            })?
            .ok_or_else(|| DbError::NotFound {
                original_name: original_name.to_string(),
            })?;

        Brand::from_row(&row).map_err(|e| {
            warn!("Decoding brand row failed: {e}");
            DbError::Storage(e)
        })
    }

    #[instrument(skip(self))]
    async fn update(&self, original_name: &str, new_mapped_name: &str) -> Result<(), DbError> {
        let stmt = self.update_statement(original_name, new_mapped_name);
        let affected = self.handle.execute(&stmt).await.map_err(|e| {
            warn!("Update failed: {e}");
            e
        })?;
        debug!(rows_affected = affected, "update done");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, original_name: &str) -> Result<(), DbError> {
        let stmt = self.delete_statement(original_name);
        let affected = self.handle.execute(&stmt).await.map_err(|e| {
            warn!("Delete failed: {e}");
            e
        })?;
        debug!(rows_affected = affected, "delete done");
        Ok(())
    }
}
