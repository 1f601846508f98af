//! commis CLI - SQL schema inference tool

mod args;
mod config;
mod output;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use commis_core::{normalize, SchemaInferrer, SourceCatalog, SqlDialect, ValidationPolicy};
use miette::{IntoDiagnostic, Result};

use crate::args::{Args, Command, OutputFormat};
use crate::config::Config;
use crate::output::OutputFormatter;

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing; -v raises the default level, RUST_LOG still wins
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(verbosity_level(args.verbose).into()),
        )
        .init();

    match run(args) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<bool> {
    match args.command {
        Command::Check {
            files,
            dialect,
            config: config_path,
            format,
        } => {
            let dialect: SqlDialect = dialect.parse().map_err(|e: String| miette::miette!(e))?;
            let config = load_config(config_path)?.merge_with_args(&files, &format, &None);
            let query_files = collect_query_files(&config)?;
            let output_format = resolve_format(&config);

            let policy = ValidationPolicy::default();
            let mut total_errors = 0;
            for query_file in &query_files {
                let content = fs::read_to_string(query_file).into_diagnostic()?;
                if let Err(e) = policy.validate(&content, dialect) {
                    let formatter =
                        OutputFormatter::new(output_format, query_file.display().to_string());
                    formatter.print_error(&e.into(), &content);
                    total_errors += 1;
                }
            }

            print_summary(total_errors, query_files.len(), args.quiet);
            Ok(total_errors > 0)
        }

        Command::Infer {
            files,
            dialect,
            tables,
            config: config_path,
            format,
        } => {
            let dialect: SqlDialect = dialect.parse().map_err(|e: String| miette::miette!(e))?;
            let config = load_config(config_path)?.merge_with_args(&files, &format, &tables);
            let query_files = collect_query_files(&config)?;
            let output_format = resolve_format(&config);

            let catalog: Option<SourceCatalog> = match &config.tables {
                Some(path) => Some(config::load_catalog(&PathBuf::from(path), dialect)?),
                None => None,
            };

            let mut inferrer = SchemaInferrer::new(dialect);
            if let Some(catalog) = &catalog {
                inferrer = inferrer.with_catalog(catalog);
            }

            let mut total_errors = 0;
            for query_file in &query_files {
                let content = fs::read_to_string(query_file).into_diagnostic()?;
                let formatter =
                    OutputFormatter::new(output_format, query_file.display().to_string());
                match inferrer.infer(&content) {
                    Ok(schema) => formatter.print_schema(&schema),
                    Err(e) => {
                        formatter.print_error(&e, &content);
                        total_errors += 1;
                    }
                }
            }

            print_summary(total_errors, query_files.len(), args.quiet);
            Ok(total_errors > 0)
        }

        Command::Normalize { file, dialect } => {
            let dialect: SqlDialect = dialect.parse().map_err(|e: String| miette::miette!(e))?;
            let content = fs::read_to_string(&file).into_diagnostic()?;
            println!("{}", normalize(&content, dialect));
            Ok(false)
        }
    }
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => Config::from_file(&path),
        None => Ok(Config::find_and_load()?.unwrap_or_default()),
    }
}

fn resolve_format(config: &Config) -> OutputFormat {
    match config.format.as_deref() {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Human,
    }
}

/// Expand glob patterns from config into concrete file paths
fn collect_query_files(config: &Config) -> Result<Vec<PathBuf>> {
    let mut query_files = Vec::new();
    for pattern in &config.files {
        if pattern.contains('*') {
            for path in glob::glob(pattern).into_diagnostic()?.flatten() {
                query_files.push(path);
            }
        } else {
            query_files.push(PathBuf::from(pattern));
        }
    }

    if query_files.is_empty() {
        miette::bail!("No query files specified. Pass file paths or configure in commis.toml");
    }
    Ok(query_files)
}

fn verbosity_level(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

fn print_summary(total_errors: usize, file_count: usize, quiet: bool) {
    if total_errors > 0 {
        eprintln!(
            "Found {} error(s) in {} file(s)",
            total_errors, file_count
        );
    } else if !quiet {
        eprintln!("All {} file(s) passed", file_count);
    }
}
