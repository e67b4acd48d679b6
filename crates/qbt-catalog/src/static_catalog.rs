use std::collections::HashMap;

use qbt_ir::{Column, DataType, FunctionDesc, TableDesc};
use qbt_function_registry::FunctionRegistry;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::r#trait::Catalog;

/// An in-memory catalog over a fixed schema, for tests and demos.
///
/// Carries the same small `users`/`orders`/`order_items` playground schema
/// a catalog test double typically ships with, adapted to this crate's
/// synchronous contract.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    tables: HashMap<String, TableDesc>,
    functions: FunctionRegistry,
}

impl StaticCatalog {
    pub fn new() -> Self {
        let users = TableDesc::new(
            "users",
            vec![
                Column::new("users", "id", DataType::Int),
                Column::new("users", "username", DataType::Text),
                Column::new("users", "email", DataType::Text),
                Column::new("users", "created_at", DataType::Text),
            ],
        );
        let orders = TableDesc::new(
            "orders",
            vec![
                Column::new("orders", "id", DataType::Int),
                Column::new("orders", "user_id", DataType::Int),
                Column::new("orders", "total", DataType::Double),
                Column::new("orders", "status", DataType::Text),
            ],
        );
        let order_items = TableDesc::new(
            "order_items",
            vec![
                Column::new("order_items", "id", DataType::Int),
                Column::new("order_items", "order_id", DataType::Int),
                Column::new("order_items", "product", DataType::Text),
                Column::new("order_items", "quantity", DataType::Int),
            ],
        );

        let mut tables = HashMap::new();
        for t in [users, orders, order_items] {
            tables.insert(t.id.clone(), t);
        }

        Self { tables, functions: FunctionRegistry::new() }
    }

    pub fn with_table(mut self, table: TableDesc) -> Self {
        self.tables.insert(table.id.clone(), table);
        self
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for StaticCatalog {
    fn get_table(&self, name: &str) -> CatalogResult<TableDesc> {
        self.tables.get(name).cloned().ok_or_else(|| {
            debug!(table = name, "table not found in static catalog");
            CatalogError::NoSuchTable(name.to_string())
        })
    }

    fn contains_function(&self, name: &str, arg_types: &[qbt_ir::DataType]) -> bool {
        self.functions.contains(name, arg_types)
    }

    fn get_function(&self, name: &str, arg_types: &[qbt_ir::DataType]) -> CatalogResult<FunctionDesc> {
        self.functions.resolve(name, arg_types).cloned().ok_or_else(|| {
            CatalogError::NoSuchFunction {
                name: name.to_string(),
                args: arg_types.iter().map(|t| format!("{t:?}")).collect::<Vec<_>>().join(", "),
            }
        })
    }
}
