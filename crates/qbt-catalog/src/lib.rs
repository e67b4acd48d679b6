//! The external name service the analyzer consults for tables and functions.
//!
//! `Catalog` here is a synchronous read-only collaborator (§5, §6) — a
//! deliberate departure from a live-database catalog's async trait, since
//! this crate has no connection pool to manage and the analyzer never
//! performs I/O of its own.

mod error;
mod static_catalog;
#[path = "trait.rs"]
mod r#trait;

pub use error::{CatalogError, CatalogResult};
pub use r#trait::Catalog;
pub use static_catalog::StaticCatalog;

pub use qbt_ir::{Column, DataType, FunctionDesc, FunctionType, Schema, TableDesc, TableMeta};
