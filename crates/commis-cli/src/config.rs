//! Configuration and source-table metadata files

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};

use commis_core::{ColumnMeta, SourceCatalog, SqlDialect, TableMeta};

const CONFIG_FILE_NAME: &str = "commis.toml";

/// Configuration for commis, loadable from `commis.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Query file paths or glob patterns
    #[serde(default)]
    pub files: Vec<String>,

    /// SQL dialect (snowflake, teradata, spark)
    #[serde(default)]
    pub dialect: Option<String>,

    /// Output format (human, json)
    #[serde(default)]
    pub format: Option<String>,

    /// Source table metadata file
    pub tables: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        toml::from_str(&contents).into_diagnostic()
    }

    /// Walk from the working directory upward looking for `commis.toml`
    pub fn find_and_load() -> Result<Option<Self>> {
        let cwd = std::env::current_dir().into_diagnostic()?;
        for dir in cwd.ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Self::from_file(&candidate).map(Some);
            }
        }
        Ok(None)
    }

    /// Overlay CLI arguments onto configuration; arguments win over
    /// config file values
    pub fn merge_with_args(
        mut self,
        files: &[PathBuf],
        format: &Option<crate::args::OutputFormat>,
        tables: &Option<PathBuf>,
    ) -> Self {
        if !files.is_empty() {
            self.files = files.iter().map(|p| p.display().to_string()).collect();
        }
        if let Some(fmt) = format {
            self.format = Some(format!("{:?}", fmt).to_lowercase());
        }
        if let Some(path) = tables {
            self.tables = Some(path.display().to_string());
        }
        self
    }
}

/// On-disk shape of the source table metadata file:
///
/// ```toml
/// [tables.orders]
/// order_id = "NUMBER(38,0)"
/// amount = "FLOAT"
/// ```
#[derive(Debug, Deserialize)]
struct TablesFile {
    #[serde(default)]
    tables: BTreeMap<String, BTreeMap<String, String>>,
}

/// Load declared source table metadata, resolving native type names
/// through the dialect's type map
pub fn load_catalog(path: &Path, dialect: SqlDialect) -> Result<SourceCatalog> {
    let contents = std::fs::read_to_string(path).into_diagnostic()?;
    let parsed: TablesFile = toml::from_str(&contents).into_diagnostic()?;

    let type_map = dialect.type_map();
    let mut catalog = SourceCatalog::new();
    for (table_name, columns) in parsed.tables {
        let mut table = TableMeta::new(table_name);
        for (column_name, native_type) in columns {
            table.add_column(column_name, ColumnMeta::new(type_map.resolve(&native_type)));
        }
        catalog.add_table(table);
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use commis_core::LogicalType;

    #[test]
    fn test_tables_file_parses_and_resolves_types() {
        let toml_src = r#"
            [tables.orders]
            order_id = "NUMBER(38,0)"
            note = "VARIANT"
        "#;
        let parsed: TablesFile = toml::from_str(toml_src).unwrap();
        let map = SqlDialect::Snowflake.type_map();
        let order_id = &parsed.tables["orders"]["order_id"];
        assert_eq!(map.resolve(order_id), LogicalType::Float);
        assert_eq!(map.resolve(&parsed.tables["orders"]["note"]), LogicalType::String);
    }

    #[test]
    fn test_cli_args_override_config() {
        let config = Config {
            files: vec!["old.sql".into()],
            format: Some("human".into()),
            ..Default::default()
        };
        let merged = config.merge_with_args(
            &[PathBuf::from("new.sql")],
            &Some(crate::args::OutputFormat::Json),
            &None,
        );
        assert_eq!(merged.files, vec!["new.sql"]);
        assert_eq!(merged.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_config_format_survives_when_flag_omitted() {
        let config = Config {
            format: Some("json".into()),
            ..Default::default()
        };
        let merged = config.merge_with_args(&[PathBuf::from("q.sql")], &None, &None);
        assert_eq!(merged.format.as_deref(), Some("json"));
    }
}
