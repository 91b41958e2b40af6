//! Loading entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - loads the selected columns into an in-memory [`crate::types::DataSet`]
//! - optionally reports success/failure/alerts to an [`crate::observability::AnalysisObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//!
//! Cell parsing (timestamps, entity documents, client markup) lives in [`refine`].

pub mod csv;
pub mod json;
pub mod refine;
pub mod unified;

pub use unified::{ingest_from_path, status_schema, IngestionFormat, IngestionOptions};
