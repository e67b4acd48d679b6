use serde::{Deserialize, Serialize};

use crate::data_type::DataType;

/// A fully-qualified column reference: `"<table_id>.<name>"`.
///
/// Equality and hashing are by qualified name only (§3: "Equality by
/// qualified name") — two `Column`s naming the same table/column compare
/// equal even if constructed through different schema lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub table_id: String,
    pub name: String,
    pub r#type: DataType,
}

impl Column {
    pub fn new(table_id: impl Into<String>, name: impl Into<String>, r#type: DataType) -> Self {
        Self { table_id: table_id.into(), name: name.into(), r#type }
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table_id, self.name)
    }

    pub fn value_type(&self) -> DataType {
        self.r#type
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.table_id == other.table_id && self.name == other.name
    }
}
impl Eq for Column {}

impl std::hash::Hash for Column {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.table_id.hash(state);
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_joins_table_and_column() {
        let c = Column::new("t", "a", DataType::Int);
        assert_eq!(c.qualified(), "t.a");
    }

    #[test]
    fn equality_ignores_type_mismatch() {
        let a = Column::new("t", "a", DataType::Int);
        let b = Column::new("t", "a", DataType::Long);
        assert_eq!(a, b);
    }

    #[test]
    fn equality_respects_table_and_name() {
        let a = Column::new("t1", "a", DataType::Int);
        let b = Column::new("t2", "a", DataType::Int);
        assert_ne!(a, b);
    }
}
