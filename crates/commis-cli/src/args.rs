//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "commis")]
#[command(author, version, about = "SQL schema inference tool")]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate SQL files against the structural safety policy
    Check {
        /// SQL files to check (supports glob patterns)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// SQL dialect
        #[arg(short, long, default_value = "snowflake")]
        dialect: String,

        /// Configuration file path
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format (defaults to the config file value, else human)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Infer output schemas for SQL files
    Infer {
        /// SQL files to infer schemas for (supports glob patterns)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// SQL dialect
        #[arg(short, long, default_value = "snowflake")]
        dialect: String,

        /// Source table metadata (TOML)
        #[arg(short, long, value_name = "FILE")]
        tables: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format (defaults to the config file value, else human)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print the canonical normalized form of a query
    Normalize {
        /// SQL file to normalize
        file: PathBuf,

        /// SQL dialect
        #[arg(short, long, default_value = "snowflake")]
        dialect: String,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output
    Json,
}
