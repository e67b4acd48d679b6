use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::column::Column;
use crate::data_type::DataType;

/// A table's resolved column set, keyed by qualified name
/// (`"<table_id>.<column_name>"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    columns: BTreeMap<String, Column>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(columns: impl IntoIterator<Item = Column>) -> Self {
        let mut schema = Self::new();
        for c in columns {
            schema.columns.insert(c.qualified(), c);
        }
        schema
    }

    pub fn get_column(&self, qualified_name: &str) -> Option<&Column> {
        self.columns.get(qualified_name)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.columns.contains_key(qualified_name)
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }
}

/// Table-level metadata a `TableDesc` carries alongside its schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMeta {
    pub name: String,
    pub schema: Schema,
}

/// A resolved table descriptor, as returned by `Catalog::get_table` (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDesc {
    pub id: String,
    pub meta: TableMeta,
}

impl TableDesc {
    pub fn new(id: impl Into<String>, columns: impl IntoIterator<Item = Column>) -> Self {
        let id = id.into();
        Self { meta: TableMeta { name: id.clone(), schema: Schema::with_columns(columns) }, id }
    }
}

/// Whether a resolved function is a plain scalar or an aggregate (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionType {
    General,
    Agg,
}

/// Raised by `FunctionDesc::new_instance` when late binding fails.
///
/// Instantiation failure is always a fatal condition; the caller must
/// propagate it as `InvalidQuery` rather than swallow it into a null node.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to instantiate function {name}: {reason}")]
pub struct FunctionInstantiationError {
    pub name: String,
    pub reason: String,
}

/// A resolved function descriptor, as returned by `Catalog::get_function` (§6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDesc {
    pub name: String,
    pub func_type: FunctionType,
    pub param_types: Vec<DataType>,
    pub return_type: DataType,
}

impl FunctionDesc {
    pub fn new(
        name: impl Into<String>,
        func_type: FunctionType,
        param_types: Vec<DataType>,
        return_type: DataType,
    ) -> Self {
        Self { name: name.into(), func_type, param_types, return_type }
    }

    /// Lazily bind this descriptor to a call site. Built-ins always
    /// instantiate successfully; the fallible signature exists so that a
    /// catalog which models variadic/overloaded instantiation can fail here
    /// instead of at signature lookup, and so that failure is never silently
    /// downgraded to a missing node (§9).
    pub fn new_instance(&self) -> Result<FunctionDesc, FunctionInstantiationError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_looks_up_by_qualified_name() {
        let schema = Schema::with_columns(vec![Column::new("t", "a", DataType::Int)]);
        assert!(schema.contains("t.a"));
        assert!(!schema.contains("t.b"));
        assert_eq!(schema.get_column("t.a").unwrap().name, "a");
    }

    #[test]
    fn function_instance_clones_descriptor() {
        let desc = FunctionDesc::new("count", FunctionType::Agg, vec![DataType::Any], DataType::Long);
        let inst = desc.new_instance().unwrap();
        assert_eq!(inst, desc);
    }
}
