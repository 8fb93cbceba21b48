//! Flat-file storage for the outlier pipeline.
//!
//! This crate provides:
//! - Enumeration and reading of per-exchange price files
//! - CSV rendering and writing of outlier reports

pub mod csv_storage;
pub mod error;
pub mod price_store;

pub use csv_storage::CsvStorage;
pub use error::StoreError;
pub use price_store::{PriceFileStore, REPORT_SUFFIX};
