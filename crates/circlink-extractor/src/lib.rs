//! Circlink Extractor
//!
//! Finds the references a regulatory circular makes to other documents and
//! resolves each one against a local collection of circulars.
//!
//! # Overview
//!
//! Analysis runs in two phases. The local collection is indexed once: the
//! leading pages of every circular are scanned for its number, subject, date
//! and key terms. Each analyzed document is then sent to an LLM, whose
//! candidate references are normalized, resolved against the index and
//! partitioned into locally available and external references.
//!
//! # Architecture
//!
//! ```text
//! Collection → TextSource → metadata → LocalIndex
//! Document → TextSource → PromptBuilder → LLM → normalizer → resolver → AnalysisReport
//! ```
//!
//! # Key Features
//!
//! - **Deterministic metadata**: regex rules, no LLM involvement
//! - **Parallel indexing**: per-file extraction on rayon workers
//! - **Tolerant normalization**: defaults for missing fields, code fences stripped
//! - **Soft inference failures**: an unavailable LLM yields an empty report, not an error
//!
//! # Example Usage
//!
//! ```no_run
//! use circlink_extractor::{Analyzer, AnalyzerConfig, SourceRouter};
//! use circlink_llm::MockProvider;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = Analyzer::new(MockProvider::default(), SourceRouter::default(), AnalyzerConfig::default())?;
//!
//! let build = analyzer.build_index(Path::new("circulars/")).await?;
//! println!("Indexed: {}, skipped: {}", build.indexed_count(), build.skipped_count());
//!
//! let report = analyzer.analyze(Path::new("new_circular.pdf"), &build.index).await?;
//! println!("Local: {}", report.summary.local);
//! println!("External: {}", report.summary.external);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod metadata;
mod text;
mod index;
mod prompt;
mod normalizer;
mod resolver;
mod aggregate;
mod report;
mod analyzer;


pub use error::{AnalyzerError, ExtractionFailure, FailureKind, NormalizationError, TextError};
pub use config::AnalyzerConfig;
pub use metadata::{
    extract_circular_number, extract_date, extract_key_terms, extract_metadata, extract_subject,
    KEY_TERM_VOCABULARY, MIN_SUBJECT_CHARS,
};
pub use text::{page_marker, PdfTextSource, PlainTextSource, SourceRouter};
pub use index::{build_index, index_collection, index_file, scan_collection, IndexBuild, LocalIndex};
pub use prompt::PromptBuilder;
pub use normalizer::{normalize_candidates, normalize_target, PLACEHOLDER_TEXT, UNKNOWN_TYPE};
pub use resolver::{resolve, resolve_all};
pub use aggregate::{aggregate, Aggregation, ReferenceCounts};
pub use report::{AnalysisReport, InferenceOutcome, InferenceStatus};
pub use analyzer::Analyzer;
