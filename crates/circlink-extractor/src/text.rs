//! Text sources: turning documents on disk into page-marked text
//!
//! Page boundaries are rendered as `--- Page N ---` lines. They are display
//! hints for the inference collaborator, which reports page numbers from
//! them; nothing in the core parses them.

use crate::error::TextError;
use circlink_domain::{ExtractedText, TextSource};
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Form feed, the page separator emitted by `pdftotext`
const PAGE_BREAK: char = '\u{c}';

/// Render the page marker line for a 1-based page number
pub fn page_marker(page: usize) -> String {
    format!("--- Page {} ---", page)
}

/// Join form-feed separated pages into marked text, keeping at most `max_pages`
fn mark_pages(raw: &str, max_pages: Option<usize>) -> ExtractedText {
    let mut pages: Vec<&str> = raw.split(PAGE_BREAK).collect();
    // A trailing form feed closes the last page rather than opening a new one
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    if let Some(limit) = max_pages {
        pages.truncate(limit);
    }
    if pages.iter().all(|p| p.trim().is_empty()) {
        return ExtractedText {
            text: String::new(),
            page_count: pages.len(),
        };
    }

    let mut text = String::new();
    for (idx, page) in pages.iter().enumerate() {
        if idx > 0 {
            text.push('\n');
        }
        text.push_str(&page_marker(idx + 1));
        text.push('\n');
        text.push_str(page.trim_end());
        text.push('\n');
    }

    ExtractedText {
        text,
        page_count: pages.len(),
    }
}

/// Extracts PDF text with Poppler's `pdftotext`
#[derive(Debug, Clone)]
pub struct PdfTextSource {
    program: String,
}

impl PdfTextSource {
    /// Use `pdftotext` from `PATH`
    pub fn new() -> Self {
        Self::with_program("pdftotext")
    }

    /// Use a specific `pdftotext` binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PdfTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for PdfTextSource {
    type Error = TextError;

    fn extract_text(&self, path: &Path, max_pages: Option<usize>) -> Result<ExtractedText, Self::Error> {
        if !path.exists() {
            return Err(TextError::NotFound(path.to_path_buf()));
        }

        let mut cmd = Command::new(&self.program);
        cmd.arg("-layout").arg("-enc").arg("UTF-8");
        if let Some(limit) = max_pages {
            cmd.arg("-l").arg(limit.to_string());
        }
        cmd.arg(path).arg("-");

        debug!("Running {} on {}", self.program, path.display());

        let output = cmd.output().map_err(|e| TextError::Converter {
            tool: self.program.clone(),
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(TextError::Converter {
                tool: self.program.clone(),
                path: path.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        Ok(mark_pages(&raw, max_pages))
    }
}

/// Reads plain text files; form feeds, if any, separate pages
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
    type Error = TextError;

    fn extract_text(&self, path: &Path, max_pages: Option<usize>) -> Result<ExtractedText, Self::Error> {
        if !path.exists() {
            return Err(TextError::NotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        Ok(mark_pages(&raw, max_pages))
    }
}

/// Dispatches to a text source by file extension
#[derive(Debug, Clone, Default)]
pub struct SourceRouter {
    pdf: PdfTextSource,
    plain: PlainTextSource,
}

impl SourceRouter {
    /// Create a router around a specific PDF source
    pub fn new(pdf: PdfTextSource) -> Self {
        Self {
            pdf,
            plain: PlainTextSource,
        }
    }
}

impl TextSource for SourceRouter {
    type Error = TextError;

    fn extract_text(&self, path: &Path, max_pages: Option<usize>) -> Result<ExtractedText, Self::Error> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => self.pdf.extract_text(path, max_pages),
            "txt" | "text" | "md" => self.plain.extract_text(path, max_pages),
            _ => Err(TextError::Unsupported(path.to_path_buf())),
        }
    }
}
