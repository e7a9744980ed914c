//! The analysis report written for each analyzed document

use crate::aggregate::{aggregate, ReferenceCounts};
use crate::error::{AnalyzerError, FailureKind};
use chrono::{DateTime, Utc};
use circlink_domain::ResolvedReference;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How the inference step went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceStatus {
    /// Payload decoded into candidates (possibly none)
    Ok,
    /// Collaborator failed or timed out; no candidates
    CollaboratorUnavailable,
    /// Payload was not a sequence of records; no candidates
    NormalizationError,
}

/// Outcome of the inference step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceOutcome {
    /// Status
    pub status: InferenceStatus,

    /// Error message when the step failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl InferenceOutcome {
    /// Successful inference
    pub fn ok() -> Self {
        Self {
            status: InferenceStatus::Ok,
            detail: None,
        }
    }

    /// Failed inference; the error's kind picks the status
    pub fn failed(error: &AnalyzerError) -> Self {
        let status = match error.kind() {
            FailureKind::NormalizationError => InferenceStatus::NormalizationError,
            _ => InferenceStatus::CollaboratorUnavailable,
        };
        Self {
            status,
            detail: Some(error.to_string()),
        }
    }

    /// Check if inference succeeded
    pub fn is_ok(&self) -> bool {
        self.status == InferenceStatus::Ok
    }
}

/// Report for one analyzed document
///
/// Field order and list order are fixed, so identical analyses serialize
/// identically apart from `analyzed_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// File name of the analyzed document
    pub source_file: String,

    /// Full path of the analyzed document
    pub source_path: PathBuf,

    /// When the analysis ran
    pub analyzed_at: DateTime<Utc>,

    /// Model that produced the candidates
    pub model: String,

    /// Inference outcome
    pub inference: InferenceOutcome,

    /// Summary counts
    pub summary: ReferenceCounts,

    /// References available locally
    pub local_references: Vec<ResolvedReference>,

    /// References to obtain separately
    pub external_references: Vec<ResolvedReference>,

    /// Every materialized reference, in arrival order
    pub all_references: Vec<ResolvedReference>,
}

impl AnalysisReport {
    /// Assemble a report from resolved references
    pub fn new(
        source_file: impl Into<String>,
        source_path: impl Into<PathBuf>,
        model: impl Into<String>,
        inference: InferenceOutcome,
        resolved: Vec<ResolvedReference>,
        analyzed_at: DateTime<Utc>,
    ) -> Self {
        let aggregation = aggregate(&resolved);
        Self {
            source_file: source_file.into(),
            source_path: source_path.into(),
            analyzed_at,
            model: model.into(),
            inference,
            summary: aggregation.counts,
            local_references: aggregation.local,
            external_references: aggregation.external,
            all_references: resolved,
        }
    }

    /// Check if no references were found
    pub fn is_empty(&self) -> bool {
        self.summary.total == 0
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, AnalyzerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// File name the report is written under: `<stem>_references.json`
    pub fn file_name(&self) -> String {
        let stem = Path::new(&self.source_file)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_file.clone());
        format!("{}_references.json", stem)
    }
}
