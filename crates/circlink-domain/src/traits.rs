//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the resolution core and its
//! collaborators. Implementations live in other crates.

use std::path::Path;

/// Text extracted from a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Extracted text, pages separated by `--- Page N ---` markers
    pub text: String,

    /// Number of pages the text covers
    pub page_count: usize,
}

impl ExtractedText {
    /// Check if the extraction produced any usable text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Trait for extracting text from documents
///
/// Implemented by the application layer (circlink-extractor)
pub trait TextSource {
    /// Error type for text extraction
    type Error;

    /// Extract text from the document at `path`
    ///
    /// With `max_pages` set, only the leading pages are extracted.
    fn extract_text(&self, path: &Path, max_pages: Option<usize>) -> Result<ExtractedText, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (circlink-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Name of the model answering prompts
    fn model_name(&self) -> &str {
        "llm"
    }
}
