//! Error types for the CLI application.

use circlink_extractor::AnalyzerError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input document does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Input document has an extension the analyzer does not accept
    #[error("Unsupported file type: {} (expected one of: {expected})", .path.display())]
    WrongExtension {
        /// Offending path
        path: PathBuf,
        /// Accepted extensions
        expected: String,
    },

    /// Analysis error
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CliError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound(_) => 2,
            CliError::WrongExtension { .. } => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::NotFound(PathBuf::from("x.pdf")).exit_code(), 2);
        let wrong = CliError::WrongExtension {
            path: PathBuf::from("x.docx"),
            expected: "pdf".to_string(),
        };
        assert_eq!(wrong.exit_code(), 3);
        assert_eq!(CliError::Config("bad".to_string()).exit_code(), 1);
        assert_eq!(CliError::from(AnalyzerError::Timeout(5)).exit_code(), 1);
    }

    #[test]
    fn test_messages() {
        let wrong = CliError::WrongExtension {
            path: PathBuf::from("x.docx"),
            expected: "pdf".to_string(),
        };
        assert_eq!(wrong.to_string(), "Unsupported file type: x.docx (expected one of: pdf)");
    }
}
