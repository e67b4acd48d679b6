use std::collections::HashMap;
use std::sync::Arc;

use qbt_catalog::Catalog;
use qbt_ir::{ParseTree, TableDesc};
use tracing::debug;

use crate::error::{SemanticError, SemanticResult};

/// An insertion-ordered set of table names. `input_tables` must preserve the
/// order tables were introduced (§8: "the resulting Context's `input_tables`
/// has exactly N entries") without allowing duplicates.
#[derive(Debug, Clone, Default)]
pub struct OrderedTableSet {
    order: Vec<String>,
}

impl OrderedTableSet {
    fn insert(&mut self, name: String) {
        if !self.order.contains(&name) {
            self.order.push(name);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.order.iter().any(|t| t == name)
    }
}

/// Per-scope mutable analysis state (§3, §6). Owned exclusively by its
/// analysis invocation; subcontexts created for set operations and CTAS are
/// merged back into the parent on return.
pub struct Context {
    catalog: Arc<dyn Catalog>,
    alias_to_actual: HashMap<String, String>,
    input_tables: OrderedTableSet,
    hints: Vec<(String, String)>,
    aggregation: bool,
}

impl Context {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            alias_to_actual: HashMap::new(),
            input_tables: OrderedTableSet::default(),
            hints: Vec::new(),
            aggregation: false,
        }
    }

    /// A fresh child context over the same catalog, for set-operation
    /// operands and CTAS subqueries (§3, §9: "a freshly constructed Context
    /// that is merged back on return").
    pub fn child(&self) -> Self {
        Self::new(self.catalog.clone())
    }

    /// Record `effective` (alias or bare table name) as naming `actual`.
    pub fn rename_table(&mut self, actual: &str, effective: &str) {
        self.alias_to_actual.insert(effective.to_string(), actual.to_string());
        self.input_tables.insert(effective.to_string());
    }

    pub fn get_actual_table_name(&self, effective: &str) -> Option<&str> {
        self.alias_to_actual.get(effective).map(String::as_str)
    }

    pub fn get_input_tables(&self) -> &OrderedTableSet {
        &self.input_tables
    }

    pub fn is_aggregation(&self) -> bool {
        self.aggregation
    }

    pub fn set_aggregation(&mut self) {
        self.aggregation = true;
    }

    /// Resolve `name` (an effective/alias name) to a catalog `TableDesc`.
    /// Catalog's `NoSuchTable` is caught and rewrapped per §7.
    pub fn get_table(&self, name: &str) -> SemanticResult<TableDesc> {
        let actual = self.get_actual_table_name(name).unwrap_or(name);
        self.catalog.get_table(actual).map_err(|_| {
            debug!(table = name, "table lookup failed");
            SemanticError::invalid_query(format!("table {name} does not exist"))
        })
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// Union alias maps and input tables from `child` into `self`; logical-or
    /// the aggregation flags (§6, §4.7).
    pub fn merge_context(&mut self, child: Context) {
        for (effective, actual) in child.alias_to_actual {
            self.alias_to_actual.entry(effective.clone()).or_insert(actual);
            self.input_tables.insert(effective);
        }
        self.aggregation = self.aggregation || child.aggregation;
    }

    /// Post-analysis hook (§6). The analyzer itself does not interpret
    /// hints; this exists as an attachment point for callers.
    pub fn make_hints(&mut self, _tree: &ParseTree) {}

    pub fn push_hint(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.hints.push((key.into(), value.into()));
    }

    pub fn hints(&self) -> &[(String, String)] {
        &self.hints
    }
}
