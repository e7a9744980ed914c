//! Index command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use circlink_extractor::{index_collection, SourceRouter};
use std::sync::Arc;

/// Execute the index command.
pub async fn execute_index(config: &Config, formatter: &Formatter) -> Result<()> {
    let build = index_collection(
        config.collection_dir.clone(),
        Arc::new(SourceRouter::default()),
        config.analyzer.clone(),
    )
    .await?;

    for failure in &build.skipped {
        eprintln!("{}", formatter.warning(&format!("Skipped {}: {}", failure.filename, failure.reason)));
    }
    println!("{}", formatter.format_index(&build)?);

    Ok(())
}
