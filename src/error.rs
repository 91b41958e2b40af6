use thiserror::Error;

/// Convenience result type used throughout the crate.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error type returned by loading, analysis and export functions.
///
/// There is no partial-result mode: any of these aborts the run that produced it.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error (malformed or ragged rows included).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encode/decode error outside of a specific cell.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The input does not have the shape an operation needs (missing columns/fields, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A cell could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

impl AnalysisError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }
}
