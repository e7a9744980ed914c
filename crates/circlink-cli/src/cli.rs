//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Circlink - Find and resolve the references a regulatory circular makes.
#[derive(Debug, Parser)]
#[command(name = "circlink")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the local circular collection
    #[arg(short = 'C', long, global = true, env = "CIRCLINK_COLLECTION")]
    pub collection: Option<PathBuf>,

    /// Ollama endpoint
    #[arg(long, global = true, env = "CIRCLINK_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Model used for reference extraction
    #[arg(short, long, global = true, env = "CIRCLINK_MODEL")]
    pub model: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one line per item)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a circular and resolve its references
    Analyze(AnalyzeArgs),

    /// Build and show the local collection index
    Index,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Document to analyze
    pub document: PathBuf,

    /// Directory the report is written to
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
