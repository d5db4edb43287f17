//! Repositories — one per table.
//!
//! Each repository renders statements for the handle's dialect and runs them
//! through an injected [`StorageHandle`](crate::StorageHandle). No business
//! logic lives here.

pub mod brands;

pub use brands::{BrandRepository, BrandStore, SAMPLE_BRANDS};
