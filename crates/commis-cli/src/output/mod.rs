//! Output formatting

use commis_core::{InferredSchema, SchemaError, TypeConfidence};

use crate::args::OutputFormat;

/// Output formatter for inference results and failures
pub struct OutputFormatter {
    format: OutputFormat,
    file_name: String,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, file_name: String) -> Self {
        Self { format, file_name }
    }

    /// Print a validation or inference failure in the configured format
    pub fn print_error(&self, error: &SchemaError, source: &str) {
        match self.format {
            OutputFormat::Human => self.print_error_human(error, source),
            OutputFormat::Json => self.print_error_json(error),
        }
    }

    fn print_error_human(&self, error: &SchemaError, source: &str) {
        eprintln!("\x1b[31merror\x1b[0m[{}]: {}", error.code(), error);

        if let Some(span) = error.span() {
            if span.line > 0 {
                eprintln!("  --> {}:{}:{}", self.file_name, span.line, span.column);

                if let Some(source_line) = get_source_line(source, span.line) {
                    eprintln!("   |");
                    eprintln!("{:>3} | {}", span.line, source_line);

                    let padding = " ".repeat(span.column.saturating_sub(1));
                    let underline = "^".repeat(
                        span.length
                            .min(source_line.len().saturating_sub(span.column) + 1)
                            .max(1),
                    );
                    eprintln!("   | {}{}", padding, underline);
                }
            } else {
                eprintln!("  --> {}", self.file_name);
            }
        } else {
            eprintln!("  --> {}", self.file_name);
        }

        eprintln!();
    }

    fn print_error_json(&self, error: &SchemaError) {
        let output = serde_json::json!({
            "file": self.file_name,
            "code": error.code(),
            "message": error.to_string(),
            "span": error.span(),
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    }

    /// Print an inferred schema in the configured format
    pub fn print_schema(&self, schema: &InferredSchema) {
        match self.format {
            OutputFormat::Human => self.print_schema_human(schema),
            OutputFormat::Json => self.print_schema_json(schema),
        }
    }

    fn print_schema_human(&self, schema: &InferredSchema) {
        println!("{}:", self.file_name);
        let name_width = schema
            .columns()
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0);
        for col in schema {
            let nullable = if col.nullable { "NULL" } else { "NOT NULL" };
            let confidence = match col.confidence {
                TypeConfidence::Declared => "declared",
                TypeConfidence::Inferred => "inferred",
                TypeConfidence::Fallback => "fallback",
            };
            println!(
                "  {:<name_width$}  {:<9}  {:<8}  ({})",
                col.name,
                col.data_type.display_name(),
                nullable,
                confidence,
            );
        }
        println!();
    }

    fn print_schema_json(&self, schema: &InferredSchema) {
        let output = serde_json::json!({
            "file": self.file_name,
            "columns": schema.columns(),
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    }
}

/// Get a specific line from source (1-indexed)
fn get_source_line(source: &str, line: usize) -> Option<&str> {
    source.lines().nth(line.saturating_sub(1))
}
