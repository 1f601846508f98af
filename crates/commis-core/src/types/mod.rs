//! Logical type system
//!
//! The feature-store layer consumes abstract logical types, not
//! database-native type names. Dialect-native names are translated into
//! this set through [`crate::dialect::DialectTypeMap`].

use serde::{Deserialize, Serialize};

/// Logical column type understood by the feature-store layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalType {
    Float,
    Int64,
    String,
    Bool,
    Timestamp,
    Date,
}

impl LogicalType {
    /// Feature-store name for this type
    pub fn display_name(&self) -> &'static str {
        match self {
            LogicalType::Float => "FLOAT",
            LogicalType::Int64 => "INT64",
            LogicalType::String => "STRING",
            LogicalType::Bool => "BOOL",
            LogicalType::Timestamp => "TIMESTAMP",
            LogicalType::Date => "DATE",
        }
    }

    /// Whether this is an integral numeric type
    pub fn is_integral(&self) -> bool {
        matches!(self, LogicalType::Int64)
    }

    /// Whether this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(self, LogicalType::Float | LogicalType::Int64)
    }
}

impl std::fmt::Display for LogicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How a column's type was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeConfidence {
    /// Taken from declared source-table metadata
    Declared,
    /// Derived from the shape of the projection expression
    Inferred,
    /// Dialect default for a bare column with no metadata
    Fallback,
}
