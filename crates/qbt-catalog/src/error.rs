use thiserror::Error;

/// Errors the Catalog contract (§6) can raise. The analyzer never surfaces
/// these directly — `NoSuchTable` is caught and rewrapped as
/// `InvalidQuery("table ... does not exist")` per §7.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("table `{0}` does not exist")]
    NoSuchTable(String),

    #[error("no function matches `{name}({args})`")]
    NoSuchFunction { name: String, args: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
