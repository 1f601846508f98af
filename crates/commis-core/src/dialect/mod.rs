//! SQL dialect support
//!
//! Each supported warehouse dialect carries its own tokenizer dialect and
//! a static mapping from native type names to logical types. The maps are
//! built once per process and shared read-only across threads.

use std::str::FromStr;
use std::sync::OnceLock;

use indexmap::IndexMap;
use sqlparser::dialect::{Dialect, GenericDialect, HiveDialect, SnowflakeDialect};

use crate::types::LogicalType;

/// Supported SQL warehouse dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlDialect {
    #[default]
    Snowflake,
    Teradata,
    SparkEmr,
}

impl SqlDialect {
    /// Get the sqlparser dialect for tokenizing
    pub fn tokenizer_dialect(&self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::Snowflake => Box::new(SnowflakeDialect {}),
            // sqlparser has no Teradata dialect; the generic tokenizer
            // covers its lexical rules
            SqlDialect::Teradata => Box::new(GenericDialect {}),
            SqlDialect::SparkEmr => Box::new(HiveDialect {}),
        }
    }

    /// Native-type-name to logical-type map for this dialect
    pub fn type_map(&self) -> &'static DialectTypeMap {
        static SNOWFLAKE: OnceLock<DialectTypeMap> = OnceLock::new();
        static TERADATA: OnceLock<DialectTypeMap> = OnceLock::new();
        static SPARK_EMR: OnceLock<DialectTypeMap> = OnceLock::new();

        match self {
            SqlDialect::Snowflake => SNOWFLAKE.get_or_init(snowflake_type_map),
            SqlDialect::Teradata => TERADATA.get_or_init(teradata_type_map),
            SqlDialect::SparkEmr => SPARK_EMR.get_or_init(spark_type_map),
        }
    }

    /// Default logical type for bare columns with no declared metadata
    pub fn fallback_type(&self) -> LogicalType {
        LogicalType::String
    }

    /// Whether a column is a warehouse-internal system column that should
    /// be dropped from inferred schemas
    pub fn is_system_column(&self, name: &str) -> bool {
        match self {
            // Byte-boundary-safe: names may be non-ASCII quoted identifiers
            SqlDialect::Snowflake => name
                .get(..4)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("SYS_")),
            SqlDialect::Teradata | SqlDialect::SparkEmr => false,
        }
    }
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snowflake" => Ok(SqlDialect::Snowflake),
            "teradata" => Ok(SqlDialect::Teradata),
            "spark" | "spark_sql_emr" | "spark-emr" => Ok(SqlDialect::SparkEmr),
            _ => Err(format!(
                "Unknown dialect: '{}'. Supported dialects: snowflake, teradata, spark.",
                s
            )),
        }
    }
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlDialect::Snowflake => write!(f, "snowflake"),
            SqlDialect::Teradata => write!(f, "teradata"),
            SqlDialect::SparkEmr => write!(f, "spark"),
        }
    }
}

/// Read-only mapping from dialect-native type names to logical types
#[derive(Debug, Clone)]
pub struct DialectTypeMap {
    entries: IndexMap<&'static str, LogicalType>,
    fallback: LogicalType,
}

impl DialectTypeMap {
    fn from_entries(entries: &[(&'static str, LogicalType)], fallback: LogicalType) -> Self {
        Self {
            entries: entries.iter().copied().collect(),
            fallback,
        }
    }

    /// Look up a native type name without applying the fallback.
    ///
    /// Precision/scale suffixes are ignored, so `NUMBER(12,2)` resolves
    /// the same as `NUMBER`.
    pub fn get(&self, native: &str) -> Option<LogicalType> {
        let base = native.split('(').next().unwrap_or(native).trim();
        self.entries.get(base.to_uppercase().as_str()).copied()
    }

    /// Resolve a native type name, falling back to the dialect default
    /// for unrecognized names
    pub fn resolve(&self, native: &str) -> LogicalType {
        self.get(native).unwrap_or(self.fallback)
    }
}

fn snowflake_type_map() -> DialectTypeMap {
    DialectTypeMap::from_entries(
        &[
            ("NUMBER", LogicalType::Float),
            ("DECIMAL", LogicalType::Float),
            ("NUMERIC", LogicalType::Float),
            ("FLOAT", LogicalType::Float),
            ("DOUBLE", LogicalType::Float),
            ("REAL", LogicalType::Float),
            ("INT", LogicalType::Int64),
            ("INTEGER", LogicalType::Int64),
            ("BIGINT", LogicalType::Int64),
            ("SMALLINT", LogicalType::Int64),
            ("TINYINT", LogicalType::Int64),
            ("VARCHAR", LogicalType::String),
            ("CHAR", LogicalType::String),
            ("STRING", LogicalType::String),
            ("TEXT", LogicalType::String),
            ("BOOLEAN", LogicalType::Bool),
            ("DATE", LogicalType::Date),
            ("DATETIME", LogicalType::Timestamp),
            ("TIMESTAMP", LogicalType::Timestamp),
            ("TIMESTAMP_NTZ", LogicalType::Timestamp),
            ("TIMESTAMP_LTZ", LogicalType::Timestamp),
            ("TIMESTAMP_TZ", LogicalType::Timestamp),
            // Semi-structured types are surfaced as strings
            ("ARRAY", LogicalType::String),
            ("OBJECT", LogicalType::String),
            ("VARIANT", LogicalType::String),
        ],
        LogicalType::String,
    )
}

fn teradata_type_map() -> DialectTypeMap {
    DialectTypeMap::from_entries(
        &[
            ("BYTEINT", LogicalType::Int64),
            ("SMALLINT", LogicalType::Int64),
            ("INTEGER", LogicalType::Int64),
            ("INT", LogicalType::Int64),
            ("BIGINT", LogicalType::Int64),
            ("DECIMAL", LogicalType::Float),
            ("NUMBER", LogicalType::Float),
            ("NUMERIC", LogicalType::Float),
            ("FLOAT", LogicalType::Float),
            ("REAL", LogicalType::Float),
            ("VARCHAR", LogicalType::String),
            ("CHAR", LogicalType::String),
            ("CLOB", LogicalType::String),
            ("DATE", LogicalType::Date),
            ("TIME", LogicalType::Timestamp),
            ("TIMESTAMP", LogicalType::Timestamp),
        ],
        LogicalType::String,
    )
}

fn spark_type_map() -> DialectTypeMap {
    DialectTypeMap::from_entries(
        &[
            ("TINYINT", LogicalType::Int64),
            ("SMALLINT", LogicalType::Int64),
            ("INT", LogicalType::Int64),
            ("INTEGER", LogicalType::Int64),
            ("BIGINT", LogicalType::Int64),
            ("LONG", LogicalType::Int64),
            ("FLOAT", LogicalType::Float),
            ("DOUBLE", LogicalType::Float),
            ("DECIMAL", LogicalType::Float),
            ("STRING", LogicalType::String),
            ("VARCHAR", LogicalType::String),
            ("CHAR", LogicalType::String),
            ("BOOLEAN", LogicalType::Bool),
            ("DATE", LogicalType::Date),
            ("TIMESTAMP", LogicalType::Timestamp),
            ("ARRAY", LogicalType::String),
            ("STRUCT", LogicalType::String),
            ("MAP", LogicalType::String),
        ],
        LogicalType::String,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("snowflake".parse::<SqlDialect>(), Ok(SqlDialect::Snowflake));
        assert_eq!("Teradata".parse::<SqlDialect>(), Ok(SqlDialect::Teradata));
        assert_eq!("spark".parse::<SqlDialect>(), Ok(SqlDialect::SparkEmr));
        assert!("bigquery".parse::<SqlDialect>().is_err());
    }

    #[test]
    fn test_type_map_lookup_strips_precision() {
        let map = SqlDialect::Snowflake.type_map();
        assert_eq!(map.resolve("NUMBER(12,2)"), LogicalType::Float);
        assert_eq!(map.resolve("varchar(255)"), LogicalType::String);
    }

    #[test]
    fn test_type_map_fallback() {
        let map = SqlDialect::Teradata.type_map();
        assert_eq!(map.get("GEOMETRY"), None);
        assert_eq!(map.resolve("GEOMETRY"), LogicalType::String);
    }

    #[test]
    fn test_dialects_disagree_on_integer_width_types() {
        // NUMBER is exact-numeric on Snowflake and Teradata, absent on Spark
        assert_eq!(
            SqlDialect::Snowflake.type_map().resolve("NUMBER"),
            LogicalType::Float
        );
        assert_eq!(SqlDialect::SparkEmr.type_map().get("NUMBER"), None);
    }

    #[test]
    fn test_system_column_filter() {
        assert!(SqlDialect::Snowflake.is_system_column("SYS_LOAD_TS"));
        assert!(SqlDialect::Snowflake.is_system_column("sys_id"));
        assert!(!SqlDialect::Snowflake.is_system_column("system_time"));
        assert!(!SqlDialect::Teradata.is_system_column("SYS_LOAD_TS"));
    }

    #[test]
    fn test_system_column_filter_handles_multibyte_names() {
        // Quoted identifiers can put a multi-byte character across the
        // prefix boundary
        assert!(!SqlDialect::Snowflake.is_system_column("数据列"));
        assert!(!SqlDialect::Snowflake.is_system_column("sé"));
    }
}
