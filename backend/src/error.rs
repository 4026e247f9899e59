//! Error types for ingestion, configuration and artifact operations.
//!
//! The analytical core (normalizers, aggregators, scorers) is total and never
//! returns errors. Everything that touches the outside world (files, column
//! headers, numeric cells, TOML) reports a [`PipelineError`].

use std::fmt;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Structured context describing where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "read_csv", "write_document")
    pub operation: Option<String>,
    /// The file involved, if any
    pub path: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the file path.
    pub fn with_path(mut self, path: impl AsRef<std::path::Path>) -> Self {
        self.path = Some(path.as_ref().display().to_string());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref path) = self.path {
            parts.push(format!("path={}", path));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// A malformed cell in the uploaded data.
///
/// `row` is the 0-based index of the data row (header excluded), so the
/// offending spreadsheet line is `row + 2` for CSV input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("row {row}, column '{column}': cannot use '{value}' ({reason})")]
pub struct ParseError {
    pub row: usize,
    pub column: String,
    pub value: String,
    pub reason: String,
}

impl ParseError {
    pub fn new(
        row: usize,
        column: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            row,
            column: column.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Error type for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Filesystem errors while reading input or writing the artifact.
    #[error("I/O error: {message} {context}")]
    Io {
        message: String,
        context: ErrorContext,
    },

    /// A cell could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A required column has no matching header.
    #[error("Missing required column '{column}' (found headers: {headers})")]
    MissingColumn { column: String, headers: String },

    /// Invalid configuration file or rule table.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON/CSV encoding problems not attributable to a single cell.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PipelineError {
    /// Build an I/O error from a `std::io::Error` and context.
    pub fn io(err: std::io::Error, context: ErrorContext) -> Self {
        Self::Io {
            message: err.to_string(),
            context,
        }
    }

    /// The parse error behind this failure, if any.
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new("read_csv")
            .with_path("usage.csv")
            .with_details("permission denied");
        let text = ctx.to_string();
        assert!(text.contains("operation=read_csv"));
        assert!(text.contains("path=usage.csv"));
        assert!(text.contains("details=permission denied"));
    }

    #[test]
    fn test_parse_error_message_names_row_and_column() {
        let err = ParseError::new(4, "price", "abc", "not a number");
        let msg = err.to_string();
        assert!(msg.contains("row 4"));
        assert!(msg.contains("'price'"));
        assert!(msg.contains("'abc'"));
    }

    #[test]
    fn test_pipeline_error_wraps_parse_error() {
        let err: PipelineError = ParseError::new(0, "quantity", "-2", "negative").into();
        assert_eq!(err.as_parse_error().map(|e| e.row), Some(0));
        assert!(err.to_string().starts_with("Parse error"));
    }
}
