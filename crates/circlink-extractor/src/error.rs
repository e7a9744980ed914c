//! Error types for the Extractor

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Kind of failure, so callers can pick a retry-vs-abort policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A document yielded no usable text
    ExtractionFailure,
    /// The inference collaborator failed or timed out
    CollaboratorUnavailable,
    /// The inference payload was not a sequence of records
    NormalizationError,
    /// Invalid configuration
    Configuration,
    /// Filesystem error
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::ExtractionFailure => "extraction_failure",
            FailureKind::CollaboratorUnavailable => "collaborator_unavailable",
            FailureKind::NormalizationError => "normalization_error",
            FailureKind::Configuration => "configuration",
            FailureKind::Io => "io",
        };
        f.write_str(s)
    }
}

/// A document could not be turned into metadata
///
/// Soft during index builds: the file is skipped and the build continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Extraction failed for {filename}: {reason}")]
pub struct ExtractionFailure {
    /// File that failed
    pub filename: String,

    /// Reason for failure
    pub reason: String,
}

impl ExtractionFailure {
    /// Create a new extraction failure
    pub fn new(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            reason: reason.into(),
        }
    }
}

/// The inference payload could not be decoded into a sequence of records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Normalization error: {0}")]
pub struct NormalizationError(pub String);

/// Errors raised while extracting text from a document
#[derive(Error, Debug)]
pub enum TextError {
    /// Document does not exist
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    /// Collection root is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// No text source handles this file type
    #[error("Unsupported document type: {0}")]
    Unsupported(PathBuf),

    /// External converter failed
    #[error("Converter '{tool}' failed on {path}: {message}")]
    Converter {
        /// Converter program
        tool: String,
        /// Document path
        path: PathBuf,
        /// Converter output or spawn error
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during analysis
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The analyzed document yielded no usable text
    #[error(transparent)]
    Extraction(#[from] ExtractionFailure),

    /// Text extraction error
    #[error("Text extraction error: {0}")]
    Text(#[from] TextError),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Inference timeout
    #[error("Inference timeout after {0} seconds")]
    Timeout(u64),

    /// Payload not decodable
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(String),
}

impl AnalyzerError {
    /// Kind of failure
    pub fn kind(&self) -> FailureKind {
        match self {
            AnalyzerError::Extraction(_) | AnalyzerError::Text(_) => FailureKind::ExtractionFailure,
            AnalyzerError::Llm(_) | AnalyzerError::Timeout(_) => FailureKind::CollaboratorUnavailable,
            AnalyzerError::Normalization(_) => FailureKind::NormalizationError,
            AnalyzerError::Config(_) => FailureKind::Configuration,
            AnalyzerError::Io(_) | AnalyzerError::Json(_) => FailureKind::Io,
        }
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(e: serde_json::Error) -> Self {
        AnalyzerError::Json(e.to_string())
    }
}
