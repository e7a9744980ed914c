//! Core Analyzer implementation

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, ExtractionFailure};
use crate::index::{index_collection, IndexBuild, LocalIndex};
use crate::normalizer::normalize_candidates;
use crate::prompt::PromptBuilder;
use crate::report::{AnalysisReport, InferenceOutcome};
use crate::resolver::resolve_all;
use chrono::Utc;
use circlink_domain::{CandidateReference, ExtractedText, LlmProvider, TextSource};
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Analyzer finds the references inside a document and resolves them
/// against the local collection
pub struct Analyzer<L, T>
where
    L: LlmProvider,
    T: TextSource,
{
    llm_provider: Arc<L>,
    text_source: Arc<T>,
    config: AnalyzerConfig,
}

impl<L, T> Analyzer<L, T>
where
    L: LlmProvider + Send + Sync + 'static,
    T: TextSource + Send + Sync + 'static,
    L::Error: Display,
    T::Error: Display,
{
    /// Create a new Analyzer
    pub fn new(llm_provider: L, text_source: T, config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        config.validate().map_err(AnalyzerError::Config)?;
        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            text_source: Arc::new(text_source),
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Scan the collection directory and build the local index
    pub async fn build_index(&self, collection_dir: &Path) -> Result<IndexBuild, AnalyzerError> {
        index_collection(
            collection_dir.to_path_buf(),
            Arc::clone(&self.text_source),
            self.config.clone(),
        )
        .await
    }

    /// Analyze one document against the local index
    ///
    /// Inference failures do not fail the analysis: the report is produced
    /// with zero references and the failure recorded in its inference outcome.
    /// Only a document without usable text is an error.
    pub async fn analyze(&self, path: &Path, index: &LocalIndex) -> Result<AnalysisReport, AnalyzerError> {
        let source_file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let source_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        info!("Analyzing {} against {} local circulars", source_file, index.len());

        let extracted = self.extract_document(path, &source_file).await?;
        if extracted.is_blank() {
            return Err(ExtractionFailure::new(&source_file, "no usable text").into());
        }

        debug!("Extracted {} pages, {} chars", extracted.page_count, extracted.text.len());

        let prompt = PromptBuilder::new(extracted.text, source_file.clone())
            .with_local_index(index, self.config.local_listing_limit)
            .with_max_chars(self.config.max_prompt_chars)
            .build();

        let (candidates, inference) = match self.infer_candidates(&prompt).await {
            Ok(candidates) => (candidates, InferenceOutcome::ok()),
            Err(e) => {
                warn!("Inference failed ({}): {}; continuing with no candidates", e.kind(), e);
                (Vec::new(), InferenceOutcome::failed(&e))
            }
        };

        let resolved = resolve_all(&candidates, index, &source_file);

        let report = AnalysisReport::new(
            source_file,
            source_path,
            self.llm_provider.model_name(),
            inference,
            resolved,
            Utc::now(),
        );

        info!(
            "Analysis complete: {} references ({} local, {} external)",
            report.summary.total, report.summary.local, report.summary.external
        );

        Ok(report)
    }

    /// Run the inference collaborator and normalize its payload
    ///
    /// The payload is parsed atomically: all candidates or an error.
    pub async fn infer_candidates(&self, prompt: &str) -> Result<Vec<CandidateReference>, AnalyzerError> {
        debug!("Prompt length: {} chars", prompt.len());

        let response = timeout(self.config.inference_timeout(), self.call_llm(prompt))
            .await
            .map_err(|_| AnalyzerError::Timeout(self.config.inference_timeout_secs))??;

        debug!("LLM response length: {} chars", response.len());

        let candidates = normalize_candidates(&response)?;

        info!("Parsed {} reference candidates", candidates.len());
        Ok(candidates)
    }

    /// Extract the full text of the document being analyzed
    async fn extract_document(&self, path: &Path, source_file: &str) -> Result<ExtractedText, AnalyzerError> {
        let source = Arc::clone(&self.text_source);
        let path = path.to_path_buf();
        let source_file = source_file.to_string();

        // Extraction may shell out to pdftotext
        tokio::task::spawn_blocking(move || {
            source
                .extract_text(&path, None)
                .map_err(|e| AnalyzerError::from(ExtractionFailure::new(&source_file, e.to_string())))
        })
        .await
        .map_err(|e| AnalyzerError::Io(std::io::Error::other(format!("Task join error: {}", e))))?
    }

    /// Call the LLM provider
    async fn call_llm(&self, prompt: &str) -> Result<String, AnalyzerError> {
        let llm = Arc::clone(&self.llm_provider);
        let prompt = prompt.to_string();

        // LlmProvider is blocking; keep it off the async workers
        tokio::task::spawn_blocking(move || {
            llm.generate(&prompt)
                .map_err(|e| AnalyzerError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| AnalyzerError::Llm(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::PlainTextSource;
    use circlink_llm::MockProvider;

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalyzerConfig {
            inference_timeout_secs: 0,
            ..AnalyzerConfig::default()
        };
        let result = Analyzer::new(MockProvider::default(), PlainTextSource, config);
        assert!(matches!(result, Err(AnalyzerError::Config(_))));
    }

    #[tokio::test]
    async fn test_infer_candidates_normalizes() {
        let analyzer = Analyzer::new(
            MockProvider::new(r#"[{"text": "SEBI/X/1", "matched_local_file": "EXTERNAL"}]"#),
            PlainTextSource,
            AnalyzerConfig::default(),
        )
        .unwrap();

        let candidates = analyzer.infer_candidates("prompt").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].matched_target.is_none());
    }

    #[tokio::test]
    async fn test_infer_candidates_unavailable() {
        let analyzer = Analyzer::new(MockProvider::unavailable(), PlainTextSource, AnalyzerConfig::default())
            .unwrap();
        let result = analyzer.infer_candidates("prompt").await;
        assert!(matches!(result, Err(AnalyzerError::Llm(_))));
    }

    #[tokio::test]
    async fn test_missing_document_is_extraction_failure() {
        let analyzer = Analyzer::new(MockProvider::default(), PlainTextSource, AnalyzerConfig::default())
            .unwrap();
        let result = analyzer
            .analyze(Path::new("/no/such/doc.txt"), &LocalIndex::default())
            .await;
        assert!(matches!(result, Err(AnalyzerError::Extraction(_))));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_analyze_reads_document_on_blocking_pool() {
        let dir = tempfile::TempDir::new().unwrap();
        let doc = dir.path().join("new.txt");
        std::fs::write(&doc, "Refer circular SEBI/X/1 for details.").unwrap();

        let analyzer = Analyzer::new(
            MockProvider::new(r#"[{"text": "circular SEBI/X/1", "matched_local_file": "EXTERNAL"}]"#),
            PlainTextSource,
            AnalyzerConfig::default(),
        )
        .unwrap();

        let report = analyzer.analyze(&doc, &LocalIndex::default()).await.unwrap();
        assert_eq!(report.source_file, "new.txt");
        assert_eq!(report.summary.external, 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_build_index_missing_collection() {
        let dir = tempfile::TempDir::new().unwrap();
        let analyzer = Analyzer::new(MockProvider::default(), PlainTextSource, AnalyzerConfig::default())
            .unwrap();
        let result = analyzer.build_index(&dir.path().join("absent")).await;
        assert!(matches!(result, Err(AnalyzerError::Text(_))));
    }
}
