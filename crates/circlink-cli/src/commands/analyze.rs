//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use circlink_domain::{LlmProvider, TextSource};
use circlink_extractor::{
    AnalysisReport, Analyzer, AnalyzerConfig, AnalyzerError, IndexBuild, SourceRouter, TextError,
};
use circlink_llm::OllamaProvider;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Execute the analyze command.
pub async fn execute_analyze(args: AnalyzeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    validate_document(&args.document, &config.analyzer)?;

    let llm = OllamaProvider::new(&config.llm.endpoint, &config.llm.model)
        .with_timeout(config.analyzer.inference_timeout());
    let analyzer = Analyzer::new(llm, SourceRouter::default(), config.analyzer.clone())?;

    let output_dir = args.output.unwrap_or_else(|| config.output_dir.clone());
    let (report, report_path) =
        run_analysis(&analyzer, &args.document, &config.collection_dir, &output_dir).await?;

    println!("{}", formatter.format_report(&report)?);
    if formatter.format() != OutputFormat::Quiet {
        eprintln!(
            "{}",
            formatter.success(&format!("Report written to {}", report_path.display()))
        );
    }

    Ok(())
}

/// Reject input the analyzer cannot take, before any work is done.
pub fn validate_document(path: &Path, config: &AnalyzerConfig) -> Result<()> {
    if !path.is_file() {
        return Err(CliError::NotFound(path.to_path_buf()));
    }

    let accepted = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| config.accepts_extension(e));
    if !accepted {
        return Err(CliError::WrongExtension {
            path: path.to_path_buf(),
            expected: config.extensions.join(", "),
        });
    }

    Ok(())
}

/// Index the collection, analyze the document and write its report.
///
/// A missing collection directory is not fatal: every reference then
/// resolves as external.
pub async fn run_analysis<L, T>(
    analyzer: &Analyzer<L, T>,
    document: &Path,
    collection_dir: &Path,
    output_dir: &Path,
) -> Result<(AnalysisReport, PathBuf)>
where
    L: LlmProvider + Send + Sync + 'static,
    T: TextSource + Send + Sync + 'static,
    L::Error: Display,
    T::Error: Display,
{
    let build = match analyzer.build_index(collection_dir).await {
        Ok(build) => build,
        Err(AnalyzerError::Text(TextError::NotFound(dir))) => {
            warn!("Collection directory {} not found; resolving against an empty index", dir.display());
            IndexBuild::default()
        }
        Err(e) => return Err(e.into()),
    };
    info!(
        "Local index ready: {} indexed, {} skipped",
        build.indexed_count(),
        build.skipped_count()
    );

    let report = analyzer.analyze(document, &build.index).await?;

    fs::create_dir_all(output_dir)?;
    let report_path = output_dir.join(report.file_name());
    fs::write(&report_path, report.to_json()?)?;
    info!("Report written to {}", report_path.display());

    Ok((report, report_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use circlink_extractor::PlainTextSource;
    use circlink_llm::MockProvider;
    use tempfile::TempDir;

    fn txt_config() -> AnalyzerConfig {
        AnalyzerConfig {
            extensions: vec!["txt".to_string()],
            ..AnalyzerConfig::default()
        }
    }

    #[test]
    fn test_missing_document() {
        let err = validate_document(Path::new("/no/such/circular.pdf"), &AnalyzerConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::NotFound(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_wrong_extension() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("circular.docx");
        fs::write(&doc, "text").unwrap();

        let err = validate_document(&doc, &AnalyzerConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::WrongExtension { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_extension_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("CIRCULAR.PDF");
        fs::write(&doc, "text").unwrap();
        assert!(validate_document(&doc, &AnalyzerConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_run_analysis_writes_report() {
        let dir = TempDir::new().unwrap();
        let collection = dir.path().join("collection");
        fs::create_dir(&collection).unwrap();
        fs::write(
            collection.join("circA.txt"),
            "Circular No. SEBI/HO/MRD/2023/1\nSubject: Margin framework for brokers\n",
        )
        .unwrap();
        let doc = dir.path().join("new.txt");
        fs::write(&doc, "Refer circular SEBI/HO/MRD/2023/1.").unwrap();

        let payload = r#"[{"text": "circular SEBI/HO/MRD/2023/1", "matched_local_file": "circA.txt"}]"#;
        let analyzer = Analyzer::new(MockProvider::new(payload), PlainTextSource, txt_config()).unwrap();
        let output = dir.path().join("reports");

        let (report, path) = run_analysis(&analyzer, &doc, &collection, &output).await.unwrap();
        assert_eq!(report.summary.local, 1);
        assert_eq!(path, output.join("new_references.json"));

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["summary"]["total"], 1);
        assert_eq!(written["local_references"][0]["local_metadata"]["filename"], "circA.txt");
    }

    #[tokio::test]
    async fn test_missing_collection_resolves_external() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("new.txt");
        fs::write(&doc, "Refer circular SEBI/HO/MRD/2023/1.").unwrap();

        let payload = r#"[{"text": "circular SEBI/HO/MRD/2023/1", "matched_local_file": "circA.txt"}]"#;
        let analyzer = Analyzer::new(MockProvider::new(payload), PlainTextSource, txt_config()).unwrap();

        let (report, _) = run_analysis(&analyzer, &doc, &dir.path().join("absent"), dir.path())
            .await
            .unwrap();
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.summary.external, 1);
    }
}
