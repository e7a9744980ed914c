//! Circular module - metadata describing one document of the local collection

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Structured metadata extracted from a regulatory circular
///
/// One record exists per successfully indexed file. Records are created
/// during the index build and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircularMetadata {
    /// File name, unique within the local collection
    pub filename: String,

    /// Absolute path of the file
    pub path: PathBuf,

    /// Circular number (e.g. `SEBI/HO/MRD/2023/45`)
    pub circular_number: Option<String>,

    /// Subject line
    pub subject: Option<String>,

    /// Issue date exactly as written in the document
    pub date: Option<String>,

    /// Vocabulary terms present in the text, in vocabulary order
    #[serde(default)]
    pub key_terms: Vec<String>,
}

impl CircularMetadata {
    /// Create an empty record for a file
    pub fn new(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
            circular_number: None,
            subject: None,
            date: None,
            key_terms: Vec::new(),
        }
    }

    /// Read-only snapshot attached to references resolved against this record
    pub fn snapshot(&self) -> MatchedCircular {
        MatchedCircular {
            filename: self.filename.clone(),
            path: self.path.clone(),
            circular_number: self.circular_number.clone(),
            subject: self.subject.clone(),
            date: self.date.clone(),
        }
    }
}

/// Snapshot of a local circular attached to a locally available reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedCircular {
    /// File name of the matched circular
    pub filename: String,

    /// Absolute path of the matched circular
    pub path: PathBuf,

    /// Circular number, if it was extracted
    pub circular_number: Option<String>,

    /// Subject, if it was extracted
    pub subject: Option<String>,

    /// Issue date, if it was extracted
    pub date: Option<String>,
}
