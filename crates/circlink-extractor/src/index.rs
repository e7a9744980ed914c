//! Local index of the circular collection
//!
//! The index is built once per run and never changes afterwards. Building it
//! is two-phase:
//!
//! 1. [`scan_collection`] walks the collection directory sequentially and
//!    yields `(filename, path)` pairs in a stable order.
//! 2. [`build_index`] extracts the leading pages of every file in parallel;
//!    each worker produces its own result and the results are merged into
//!    the map afterwards, so no map is shared between threads.
//!
//! Files that yield no usable text are skipped and reported, never inserted.

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, ExtractionFailure, TextError};
use crate::metadata::extract_metadata;
use circlink_domain::{CircularMetadata, TextSource};
use rayon::prelude::*;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Immutable mapping from filename to circular metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalIndex {
    entries: BTreeMap<String, CircularMetadata>,
}

impl LocalIndex {
    /// Build an index from records; on a repeated filename the first record wins
    pub fn from_records(records: impl IntoIterator<Item = CircularMetadata>) -> Self {
        let mut entries = BTreeMap::new();
        for record in records {
            match entries.entry(record.filename.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(existing) => {
                    warn!(
                        "Duplicate filename '{}': keeping {}, ignoring {}",
                        existing.key(),
                        existing.get().path.display(),
                        record.path.display()
                    );
                }
            }
        }
        Self { entries }
    }

    /// Look up a circular by filename
    pub fn lookup(&self, filename: &str) -> Option<&CircularMetadata> {
        self.entries.get(filename)
    }

    /// Number of indexed circulars
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the circulars in filename order
    pub fn iter(&self) -> impl Iterator<Item = &CircularMetadata> {
        self.entries.values()
    }
}

/// Result of an index build
#[derive(Debug, Clone, Default)]
pub struct IndexBuild {
    /// The finished index
    pub index: LocalIndex,

    /// Files skipped because extraction failed, in filename order
    pub skipped: Vec<ExtractionFailure>,
}

impl IndexBuild {
    /// Number of indexed files
    pub fn indexed_count(&self) -> usize {
        self.index.len()
    }

    /// Number of skipped files
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Enumerate the collection directory
///
/// Returns `(filename, path)` pairs for files with an accepted extension,
/// sorted by path. Paths are canonicalized when possible. Unreadable entries
/// are logged and skipped.
pub fn scan_collection(
    root: &Path,
    config: &AnalyzerConfig,
) -> Result<Vec<(String, PathBuf)>, TextError> {
    if !root.exists() {
        return Err(TextError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(TextError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .max_depth(config.scan_depth)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error accessing entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let accepted = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| config.accepts_extension(e));
        if !accepted {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        let path = entry
            .path()
            .canonicalize()
            .unwrap_or_else(|_| entry.path().to_path_buf());
        files.push((filename, path));
    }

    files.sort_by(|a, b| a.1.cmp(&b.1));
    debug!("Scanned {}: {} candidate files", root.display(), files.len());
    Ok(files)
}

/// Extract metadata for one file
pub fn index_file<T>(
    filename: &str,
    path: &Path,
    source: &T,
    config: &AnalyzerConfig,
) -> Result<CircularMetadata, ExtractionFailure>
where
    T: TextSource,
    T::Error: Display,
{
    let extracted = source
        .extract_text(path, Some(config.metadata_pages))
        .map_err(|e| ExtractionFailure::new(filename, e.to_string()))?;
    extract_metadata(&extracted.text, filename, path)
}

/// Build the local index from `(filename, path)` pairs
///
/// Individual failures never abort the build. The result does not depend on
/// the order of `files`.
pub fn build_index<T>(files: &[(String, PathBuf)], source: &T, config: &AnalyzerConfig) -> IndexBuild
where
    T: TextSource + Sync,
    T::Error: Display,
{
    info!("Indexing {} local files", files.len());

    let mut results: Vec<(&str, &Path, Result<CircularMetadata, ExtractionFailure>)> = files
        .par_iter()
        .map(|(filename, path)| {
            (
                filename.as_str(),
                path.as_path(),
                index_file(filename, path, source, config),
            )
        })
        .collect();

    results.sort_by(|a, b| a.0.cmp(b.0).then_with(|| a.1.cmp(b.1)));

    let mut records = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    for (_, _, result) in results {
        match result {
            Ok(meta) => records.push(meta),
            Err(failure) => {
                warn!("Skipping {}: {}", failure.filename, failure.reason);
                skipped.push(failure);
            }
        }
    }

    let build = IndexBuild {
        index: LocalIndex::from_records(records),
        skipped,
    };

    info!(
        "Index build complete: {} indexed, {} skipped",
        build.indexed_count(),
        build.skipped_count()
    );

    build
}

/// Scan and index a collection on the blocking pool
///
/// Both the walk and the extraction block, so neither may run on an async
/// worker.
pub async fn index_collection<T>(
    root: PathBuf,
    source: Arc<T>,
    config: AnalyzerConfig,
) -> Result<IndexBuild, AnalyzerError>
where
    T: TextSource + Send + Sync + 'static,
    T::Error: Display,
{
    tokio::task::spawn_blocking(move || -> Result<IndexBuild, AnalyzerError> {
        let files = scan_collection(&root, &config)?;
        Ok(build_index(&files, source.as_ref(), &config))
    })
    .await
    .map_err(|e| AnalyzerError::Io(std::io::Error::other(format!("Task join error: {}", e))))?
}
