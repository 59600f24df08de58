/*!
 * Error handling for the cdpload pipeline
 *
 * Provides detailed error types with context, suggestions, and recovery guidance.
 */

use std::path::PathBuf;
use thiserror::Error;

/// cdpload library result type
pub type Result<T> = std::result::Result<T, CdpError>;

/// Enhanced error types with context and suggestions
#[derive(Error, Debug)]
pub enum CdpError {
    /// File I/O errors with context
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
        context: ErrorContext,
    },

    /// CSV parsing errors with location information
    #[error("CSV parsing error at line {line:?}: {message}")]
    CsvParse {
        message: String,
        line: Option<usize>,
        context: ErrorContext,
    },

    /// Source file not found with suggestions
    #[error("Source file not found: {path}")]
    SourceNotFound {
        path: PathBuf,
        suggestion: String,
    },

    /// Required column absent from the CSV header
    #[error("Required column '{column}' not found in CSV header")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// Identifier field could not be parsed as an integer
    #[error("Invalid identifier '{value}' at line {line:?}")]
    InvalidIdentifier {
        value: String,
        line: Option<usize>,
    },

    /// In-place write failed; reports whether the original was restored
    #[error("Failed to write cleaned file '{path}' (original restored: {restored})")]
    WriteFailure {
        path: PathBuf,
        restored: bool,
        #[source]
        source: std::io::Error,
    },

    /// Store-level failure (connection, constraint, statement)
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        suggestion: Option<String>,
    },

    /// Generic errors with custom message
    #[error("{message}")]
    Custom {
        message: String,
        suggestion: Option<String>,
    },
}

/// Error context providing additional information
#[derive(Debug, Default, Clone)]
pub struct ErrorContext {
    pub file_path: Option<PathBuf>,
    pub line_number: Option<usize>,
    pub column_name: Option<String>,
}

impl CdpError {
    /// Create a source-not-found error with a helpful suggestion
    pub fn source_not_found(path: PathBuf) -> Self {
        let suggestion = format!(
            "Check if the file exists at '{}'. Make sure the path is correct and you have read permissions.",
            path.display()
        );
        Self::SourceNotFound { path, suggestion }
    }

    /// Create a missing-column error listing the columns that were found
    pub fn missing_column(column: &str, headers: &csv::StringRecord) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            available: headers.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create an invalid-identifier error for a row
    pub fn invalid_identifier(value: &str, line: usize) -> Self {
        Self::InvalidIdentifier {
            value: value.to_string(),
            line: Some(line),
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::SourceNotFound { suggestion, .. } => {
                format!("{}\n\nSuggestion: {}", self, suggestion)
            }
            Self::MissingColumn { available, .. } => {
                format!("{}\n\nColumns found: {}", self, available.join(", "))
            }
            Self::InvalidIdentifier { .. } => {
                format!(
                    "{}\n\nSuggestion: the identifier column must hold integer values for every row",
                    self
                )
            }
            Self::Configuration { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            Self::Custom { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            _ => self.to_string(),
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for CdpError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
            context: ErrorContext::default(),
        }
    }
}

impl From<csv::Error> for CdpError {
    fn from(err: csv::Error) -> Self {
        let (line, message) = match err.position() {
            Some(pos) => (Some(pos.line() as usize), err.to_string()),
            None => (None, err.to_string()),
        };

        Self::CsvParse {
            message,
            line,
            context: ErrorContext::default(),
        }
    }
}

impl From<rusqlite::Error> for CdpError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Persistence {
            message: err.to_string(),
        }
    }
}
