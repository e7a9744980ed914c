//! Circlink CLI - Resolve the references of regulatory circulars against a local collection.

use circlink_cli::commands;
use circlink_cli::{Cli, Command, Config, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing (log to stderr, stdout carries the output)
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> circlink_cli::Result<()> {
    // Load config; an explicit path must parse, the default one may be absent
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Command-line flags override file values
    if let Some(collection) = cli.collection {
        config.collection_dir = collection;
    }
    if let Some(endpoint) = cli.endpoint {
        config.llm.endpoint = endpoint;
    }
    if let Some(model) = cli.model {
        config.llm.model = model;
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Analyze(args) => {
            commands::execute_analyze(args, &config, &formatter).await?;
        }
        Command::Index => {
            commands::execute_index(&config, &formatter).await?;
        }
    }

    Ok(())
}
