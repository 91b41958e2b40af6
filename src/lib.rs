//! `status-analytics` loads an exported social-media status dataset into an in-memory
//! [`types::DataSet`] and turns it into aggregate count tables, written as JSON for a
//! separate display layer.
//!
//! The primary entrypoints are [`ingestion::ingest_from_path`] for loading and the analyses
//! in [`processing`]; [`report::run_all`] runs the standard set and writes one file each.
//!
//! ## What gets loaded
//!
//! A CSV export (or a JSON array / NDJSON dump) with a header naming the columns. Only the
//! configured column set is kept ([`config::DEFAULT_COLUMNS`] by default), and some status
//! columns are refined while loading:
//!
//! - `created_at` is parsed into a UTC timestamp
//! - `entities_str` is decoded from JSON (hashtags, user mentions, ...)
//! - `source` is stripped of its `<a ...>client</a>` markup
//!
//! Empty cells map to [`types::Value::Null`]. A malformed row, a missing column or an
//! undecodable entities document fails the whole load.
//!
//! ## What gets computed
//!
//! Every status is classified as [`processing::StatusType::Original`],
//! [`processing::StatusType::Repost`] (text starts with `RT`) or
//! [`processing::StatusType::Reply`] (has a reply target; this wins over `RT`), and:
//!
//! - [`processing::analyse_types`]: type counts per author
//! - [`processing::analyse_types_by`]: type counts per field value or per time bucket
//! - [`processing::analyse_relations`]: one type's counts per group
//! - [`processing::analyse_field`]: value counts of a field, rare values merged into `others`
//! - [`processing::analyse_entities`]: hashtag/mention counts over the whole dataset
//! - [`processing::analyse_replies`]: replies per replied-to status
//! - [`processing::analyse_interactions`]: mentioned users per author
//!
//! Count tables are sparse: combinations that never occur are absent rather than zero.
//!
//! ## Quick example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use status_analytics::config::Config;
//! use status_analytics::export::Exporter;
//! use status_analytics::ingestion::{ingest_from_path, IngestionOptions};
//! use status_analytics::observability::LogObserver;
//! use status_analytics::processing::analyse_types;
//!
//! # fn main() -> Result<(), status_analytics::AnalysisError> {
//! let config = Config::default();
//! let opts = IngestionOptions {
//!     observer: Some(Arc::new(LogObserver)),
//!     ..Default::default()
//! };
//! let ds = ingest_from_path("digifest16.csv", &config.schema(), &opts)?;
//!
//! let types = analyse_types(&ds, &config.status_columns)?;
//! let exporter = Exporter::new(&config.output_dir);
//! exporter.write_counts("types_per_user.json", &types)?;
//! exporter.write_totals("sum_types.json", &types.totals())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: unified loading entrypoint and format-specific implementations
//! - [`types`]: schema + in-memory dataset types
//! - [`processing`]: classification and aggregation
//! - [`table`]: result tables and group keys
//! - [`export`]: JSON writers
//! - [`report`]: the standard battery of analyses
//! - [`config`]: run configuration
//! - [`observability`]: observer hooks for load/export outcomes
//! - [`error`]: the crate error type

pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod observability;
pub mod processing;
pub mod report;
pub mod table;
pub mod types;

pub use error::{AnalysisError, AnalysisResult};
