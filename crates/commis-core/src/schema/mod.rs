//! Inferred schemas and declared source-table metadata

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{LogicalType, TypeConfidence};

/// A single inferred column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: LogicalType,
    pub nullable: bool,
    pub confidence: TypeConfidence,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, data_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            confidence: TypeConfidence::Inferred,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_confidence(mut self, confidence: TypeConfidence) -> Self {
        self.confidence = confidence;
        self
    }
}

/// Ordered result of schema inference.
///
/// Column order matches SELECT-list order; names are unique
/// (case-insensitive) by construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InferredSchema {
    columns: Vec<ColumnSpec>,
}

impl InferredSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in SELECT-list order
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Case-insensitive lookup by column name
    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

impl IntoIterator for InferredSchema {
    type Item = ColumnSpec;
    type IntoIter = std::vec::IntoIter<ColumnSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

impl<'a> IntoIterator for &'a InferredSchema {
    type Item = &'a ColumnSpec;
    type IntoIter = std::slice::Iter<'a, ColumnSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Declared metadata for one source column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub data_type: LogicalType,
    pub nullable: bool,
}

impl ColumnMeta {
    pub fn new(data_type: LogicalType) -> Self {
        Self {
            data_type,
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Declared metadata for one source table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableMeta {
    pub name: String,
    columns: IndexMap<String, ColumnMeta>,
}

impl TableMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
        }
    }

    pub fn add_column(&mut self, name: impl Into<String>, meta: ColumnMeta) {
        self.columns.insert(name.into(), meta);
    }

    /// Case-insensitive column lookup
    pub fn get_column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|s| s.as_str()).collect()
    }
}

/// Declared source-table metadata consulted for bare column references.
///
/// Read-only during inference; build it up front, then share freely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceCatalog {
    tables: IndexMap<String, TableMeta>,
}

impl SourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, table: TableMeta) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Case-insensitive table lookup
    pub fn get_table(&self, name: &str) -> Option<&TableMeta> {
        self.tables
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Resolve an unqualified column across all declared tables.
    ///
    /// Returns None when the column is absent or ambiguous (declared by
    /// more than one table).
    pub fn resolve_column(&self, name: &str) -> Option<&ColumnMeta> {
        let mut found = None;
        for table in self.tables.values() {
            if let Some(meta) = table.get_column(name) {
                if found.is_some() {
                    return None;
                }
                found = Some(meta);
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> SourceCatalog {
        let mut orders = TableMeta::new("orders");
        orders.add_column("amount", ColumnMeta::new(LogicalType::Float));
        orders.add_column("customer_id", ColumnMeta::new(LogicalType::Int64).not_null());

        let mut users = TableMeta::new("users");
        users.add_column("customer_id", ColumnMeta::new(LogicalType::Int64));
        users.add_column("email", ColumnMeta::new(LogicalType::String));

        let mut catalog = SourceCatalog::new();
        catalog.add_table(orders);
        catalog.add_table(users);
        catalog
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let catalog = sample_catalog();
        let table = catalog.get_table("ORDERS").unwrap();
        let col = table.get_column("AMOUNT").unwrap();
        assert_eq!(col.data_type, LogicalType::Float);
    }

    #[test]
    fn test_ambiguous_column_resolves_to_none() {
        let catalog = sample_catalog();
        assert!(catalog.resolve_column("customer_id").is_none());
        assert!(catalog.resolve_column("email").is_some());
        assert!(catalog.resolve_column("missing").is_none());
    }

    #[test]
    fn test_schema_get_is_case_insensitive() {
        let schema = InferredSchema::new(vec![
            ColumnSpec::new("total_spend", LogicalType::Float),
            ColumnSpec::new("order_count", LogicalType::Int64).not_null(),
        ]);
        assert_eq!(schema.names(), vec!["total_spend", "order_count"]);
        assert!(schema.get("TOTAL_SPEND").is_some());
        assert!(!schema.get("ORDER_COUNT").unwrap().nullable);
    }
}
