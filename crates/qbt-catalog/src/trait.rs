use qbt_ir::{DataType, FunctionDesc, TableDesc};

use crate::error::CatalogResult;

/// External name service the analyzer consults for table and function
/// resolution (§6).
///
/// Unlike a live-database catalog, these are synchronous value reads: the
/// analyzer performs no I/O of its own (§5), so this trait carries no
/// `async_trait` bound. Implementations backed by an actual connection pool
/// are expected to pre-fetch/cache before handing a `Catalog` to the
/// analyzer.
pub trait Catalog: Send + Sync {
    /// Resolve a table by name. Raises `NoSuchTable` if absent.
    fn get_table(&self, name: &str) -> CatalogResult<TableDesc>;

    /// Whether a function signature `(name, arg_types)` resolves.
    fn contains_function(&self, name: &str, arg_types: &[DataType]) -> bool;

    /// Resolve a function signature `(name, arg_types)`. Raises
    /// `NoSuchFunction` if no overload matches.
    fn get_function(&self, name: &str, arg_types: &[DataType]) -> CatalogResult<FunctionDesc>;
}
