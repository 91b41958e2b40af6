//! Unified loading entrypoint.
//!
//! Most callers should use [`ingest_from_path`], which loads a file into an in-memory
//! [`crate::types::DataSet`] using a provided [`crate::types::Schema`]. [`status_schema`]
//! builds that schema for the usual status export columns.
//!
//! - If [`IngestionOptions::format`] is `None`, the format is inferred from the file
//!   extension.
//! - If an [`AnalysisObserver`] is provided, success/failure/alerts are reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{AnalysisError, AnalysisResult};
use crate::observability::{self, AnalysisObserver, ObservationContext, Severity, Stage};
use crate::types::{DataSet, DataType, Field, Schema};

use super::{csv, json};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
}

impl IngestionFormat {
    /// Parse an input format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" | "jsonl" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Options controlling unified loading behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn AnalysisObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Build a schema for a set of status export columns.
///
/// Known columns get their refined type; anything else is kept as text:
///
/// | column | type |
/// |---|---|
/// | `created_at` | [`DataType::Timestamp`] |
/// | `entities_str` | [`DataType::Json`] |
/// | `source` | [`DataType::Markup`] |
/// | `user_followers_count`, `user_friends_count` | [`DataType::Int64`] |
/// | `id_str` and every `*_id_str` column | [`DataType::Id`] |
pub fn status_schema<S: AsRef<str>>(columns: &[S]) -> Schema {
    Schema::new(
        columns
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let data_type = match name {
                    "created_at" => DataType::Timestamp,
                    "entities_str" => DataType::Json,
                    "source" => DataType::Markup,
                    "user_followers_count" | "user_friends_count" => DataType::Int64,
                    "id_str" => DataType::Id,
                    _ if name.ends_with("_id_str") => DataType::Id,
                    _ => DataType::Utf8,
                };
                Field::new(name, data_type)
            })
            .collect(),
    )
}

/// Unified loading entry point for path-based sources.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row count stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use status_analytics::ingestion::{ingest_from_path, status_schema, IngestionOptions};
///
/// # fn main() -> Result<(), status_analytics::AnalysisError> {
/// let schema = status_schema(&["id_str", "from_user_id_str", "text", "in_reply_to_status_id_str"]);
///
/// // Uses `.csv` to select CSV loading.
/// let ds = ingest_from_path("digifest16.csv", &schema, &IngestionOptions::default())?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
///
/// Force a format for a file without a recognised extension:
///
/// ```no_run
/// use status_analytics::ingestion::{ingest_from_path, status_schema, IngestionFormat, IngestionOptions};
///
/// # fn main() -> Result<(), status_analytics::AnalysisError> {
/// let opts = IngestionOptions {
///     format: Some(IngestionFormat::Json),
///     ..Default::default()
/// };
/// let ds = ingest_from_path("statuses.dump", &status_schema(&["id_str", "text"]), &opts)?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &IngestionOptions,
) -> AnalysisResult<DataSet> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = ObservationContext {
        path: path.to_path_buf(),
        stage: Stage::Ingest(fmt),
    };

    let result = match fmt {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path, schema),
        IngestionFormat::Json => json::ingest_json_from_path(path, schema),
    };

    observability::report(
        options.observer.as_ref(),
        options.alert_at_or_above,
        &ctx,
        &result,
        DataSet::row_count,
    );

    result
}

fn infer_format_from_path(path: &Path) -> AnalysisResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            AnalysisError::schema(format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ))
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| {
        AnalysisError::schema(format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ))
    })
}
