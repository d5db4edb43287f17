//! `db` crate — persistence layer for brands.
//!
//! Provides the storage-handle abstraction, a sqlx-backed handle, typed row
//! structs and the `brands` repository. Statements are rendered with
//! `sea-query` and always parameterized.

pub mod config;
pub mod error;
pub mod handle;
pub mod mock;
pub mod models;
pub mod pool;
pub mod repository;
pub mod statement;

pub use config::DbConfig;
pub use error::DbError;
pub use handle::StorageHandle;
pub use models::{Brand, NewBrand};
pub use pool::SqlHandle;
pub use repository::{BrandRepository, BrandStore, SAMPLE_BRANDS};
pub use statement::{Dialect, Statement};
