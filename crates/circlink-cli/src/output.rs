//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use circlink_domain::ResolvedReference;
use circlink_extractor::{AnalysisReport, IndexBuild};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest subject shown in a table cell
const SUBJECT_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Get the output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an analysis report.
    pub fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(report.to_json()?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(self.format_report_quiet(report)),
        }
    }

    /// Format a report as summary lines plus reference tables.
    fn format_report_table(&self, report: &AnalysisReport) -> String {
        let mut out = Vec::new();

        if let Some(detail) = &report.inference.detail {
            out.push(self.warning(&format!("Inference failed: {}", detail)));
        }

        if report.is_empty() {
            out.push(self.colorize("No references found.", "yellow"));
            return out.join("\n");
        }

        out.push(self.info(&format!(
            "{}: {} references ({} local, {} external)",
            report.source_file, report.summary.total, report.summary.local, report.summary.external
        )));

        if !report.local_references.is_empty() {
            out.push(String::new());
            out.push(self.colorize("Available locally", "green"));
            out.push(local_table(&report.local_references));
        }

        if !report.external_references.is_empty() {
            out.push(String::new());
            out.push(self.colorize("External references", "magenta"));
            out.push(external_table(&report.external_references));
        }

        out.join("\n")
    }

    /// Format a report in quiet mode (one reference per line).
    fn format_report_quiet(&self, report: &AnalysisReport) -> String {
        report
            .all_references
            .iter()
            .map(|r| match r.local_metadata() {
                Some(local) => format!("local\t{}\t{}", local.filename, r.candidate.text),
                None => format!("external\t-\t{}", r.candidate.text),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format the local collection index.
    pub fn format_index(&self, build: &IndexBuild) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let skipped: Vec<serde_json::Value> = build
                    .skipped
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "filename": f.filename,
                            "reason": f.reason,
                        })
                    })
                    .collect();
                let json = serde_json::json!({
                    "indexed": build.index.iter().collect::<Vec<_>>(),
                    "skipped": skipped,
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => Ok(self.format_index_table(build)),
            OutputFormat::Quiet => Ok(build
                .index
                .iter()
                .map(|meta| meta.filename.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format the index as a table.
    fn format_index_table(&self, build: &IndexBuild) -> String {
        if build.index.is_empty() {
            return self.colorize("No circulars indexed.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Filename", "Circular No.", "Date", "Subject", "Key Terms"]);

        for meta in build.index.iter() {
            builder.push_record([
                meta.filename.clone(),
                meta.circular_number.clone().unwrap_or_else(|| "-".to_string()),
                meta.date.clone().unwrap_or_else(|| "-".to_string()),
                meta.subject
                    .as_deref()
                    .map(|s| truncate(s, SUBJECT_WIDTH))
                    .unwrap_or_else(|| "-".to_string()),
                meta.key_terms.join(", "),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let summary = self.info(&format!(
            "Indexed {} circular(s), skipped {}",
            build.indexed_count(),
            build.skipped_count()
        ));
        format!("{}\n{}", table, summary)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn local_table(references: &[ResolvedReference]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Reference", "Page", "Confidence", "Local File", "Circular No."]);

    for r in references {
        let local = r.local_metadata();
        builder.push_record([
            r.candidate.text.clone(),
            page_cell(r),
            r.candidate.confidence.to_string(),
            local.map(|m| m.filename.clone()).unwrap_or_default(),
            local
                .and_then(|m| m.circular_number.clone())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn external_table(references: &[ResolvedReference]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Reference", "Type", "Page", "Confidence"]);

    for r in references {
        builder.push_record([
            r.candidate.text.clone(),
            r.candidate.reference_type.clone(),
            page_cell(r),
            r.candidate.confidence.to_string(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn page_cell(reference: &ResolvedReference) -> String {
    reference
        .candidate
        .page
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use circlink_domain::{CandidateReference, CircularMetadata, Confidence};
    use circlink_extractor::{AnalyzerError, ExtractionFailure, InferenceOutcome, LocalIndex};

    fn candidate(text: &str, page: Option<u32>) -> CandidateReference {
        CandidateReference {
            text: text.to_string(),
            reference_type: "circular".to_string(),
            circular_number: None,
            title: None,
            page,
            context: String::new(),
            confidence: Confidence::High,
            reasoning: String::new(),
            matched_target: None,
        }
    }

    fn sample_report(inference: InferenceOutcome, with_references: bool) -> AnalysisReport {
        let mut meta = CircularMetadata::new("circA.pdf", "/docs/circA.pdf");
        meta.circular_number = Some("SEBI/X/1".to_string());
        let resolved = if with_references {
            vec![
                ResolvedReference::available_locally(candidate("circular SEBI/X/1", Some(2)), &meta),
                ResolvedReference::external(candidate("SEBI Act, 1992", None)),
            ]
        } else {
            Vec::new()
        };
        let analyzed_at = "2024-01-15T10:30:00Z".parse().unwrap();
        AnalysisReport::new("doc.pdf", "/in/doc.pdf", "mock", inference, resolved, analyzed_at)
    }

    #[test]
    fn test_report_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_report(&sample_report(InferenceOutcome::ok(), true))
            .unwrap();
        assert!(output.contains("2 references (1 local, 1 external)"));
        assert!(output.contains("Local File"));
        assert!(output.contains("circA.pdf"));
        assert!(output.contains("SEBI Act, 1992"));
    }

    #[test]
    fn test_report_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_report(&sample_report(InferenceOutcome::ok(), true))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["summary"]["local"], 1);
        assert_eq!(json["analyzed_at"], "2024-01-15T10:30:00Z");
    }

    #[test]
    fn test_report_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter
            .format_report(&sample_report(InferenceOutcome::ok(), true))
            .unwrap();
        assert_eq!(output, "local\tcircA.pdf\tcircular SEBI/X/1\nexternal\t-\tSEBI Act, 1992");
    }

    #[test]
    fn test_empty_report_mentions_failure() {
        let error = AnalyzerError::Timeout(30);
        let outcome = InferenceOutcome::failed(&error);
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_report(&sample_report(outcome, false)).unwrap();
        assert!(output.contains("Inference failed"));
        assert!(output.contains("No references found."));
    }

    #[test]
    fn test_index_formats() {
        let mut meta = CircularMetadata::new("circA.pdf", "/docs/circA.pdf");
        meta.subject = Some("x".repeat(100));
        let build = IndexBuild {
            index: LocalIndex::from_records(vec![meta]),
            skipped: vec![ExtractionFailure::new("scan.pdf", "no usable text")],
        };

        let table = Formatter::new(OutputFormat::Table, false).format_index(&build).unwrap();
        assert!(table.contains("Circular No."));
        assert!(table.contains("Indexed 1 circular(s), skipped 1"));
        assert!(!table.contains(&"x".repeat(SUBJECT_WIDTH)));

        let json = Formatter::new(OutputFormat::Json, false).format_index(&build).unwrap();
        let json: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(json["indexed"][0]["filename"], "circA.pdf");
        assert_eq!(json["skipped"][0]["filename"], "scan.pdf");

        let quiet = Formatter::new(OutputFormat::Quiet, false).format_index(&build).unwrap();
        assert_eq!(quiet, "circA.pdf");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("test"), "✗ test");
    }
}
