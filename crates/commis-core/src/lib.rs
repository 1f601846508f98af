//! commis-core: SQL schema inference library
//!
//! This library validates analytics SELECT queries against a structural
//! safety policy and infers their output schema (ordered column names and
//! logical types) without requiring a database connection. All entry
//! points are pure functions over their inputs.

pub mod dialect;
pub mod error;
pub mod infer;
mod lex;
pub mod normalize;
pub mod schema;
pub mod types;
pub mod validate;

pub use dialect::{DialectTypeMap, SqlDialect};
pub use error::{
    InferenceError, InferenceErrorKind, SchemaError, Span, ValidationError, ValidationErrorKind,
};
pub use infer::{infer_schema, SchemaInferrer};
pub use normalize::normalize;
pub use schema::{ColumnMeta, ColumnSpec, InferredSchema, SourceCatalog, TableMeta};
pub use types::{LogicalType, TypeConfidence};
pub use validate::{PolicyRule, ValidationPolicy};
