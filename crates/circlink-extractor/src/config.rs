//! Configuration for the Analyzer and the index build

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Leading pages read from each local file when extracting metadata
    pub metadata_pages: usize,

    /// Maximum document characters placed in the inference prompt
    pub max_prompt_chars: usize,

    /// Maximum local circulars listed in the inference prompt
    pub local_listing_limit: usize,

    /// Maximum time for a single inference call (seconds)
    pub inference_timeout_secs: u64,

    /// File extensions (lowercase, no dot) accepted into the local collection
    pub extensions: Vec<String>,

    /// Directory depth scanned below the collection root (1 = root only)
    pub scan_depth: usize,
}

impl AnalyzerConfig {
    /// Get the inference timeout as a Duration
    pub fn inference_timeout(&self) -> Duration {
        Duration::from_secs(self.inference_timeout_secs)
    }

    /// Check if a file extension belongs to the collection
    pub fn accepts_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.metadata_pages == 0 {
            return Err("metadata_pages must be greater than 0".to_string());
        }
        if self.max_prompt_chars == 0 {
            return Err("max_prompt_chars must be greater than 0".to_string());
        }
        if self.inference_timeout_secs == 0 {
            return Err("inference_timeout_secs must be greater than 0".to_string());
        }
        if self.scan_depth == 0 {
            return Err("scan_depth must be greater than 0".to_string());
        }
        if self.extensions.is_empty() {
            return Err("extensions must not be empty".to_string());
        }
        if let Some(bad) = self.extensions.iter().find(|e| e.starts_with('.') || **e != e.to_lowercase()) {
            return Err(format!("extension '{}' must be lowercase without a leading dot", bad));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            metadata_pages: 3,
            max_prompt_chars: 100_000,
            local_listing_limit: 200,
            inference_timeout_secs: 300,
            extensions: vec!["pdf".to_string()],
            scan_depth: 1,
        }
    }
}
