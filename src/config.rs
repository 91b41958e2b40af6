//! Run configuration.
//!
//! Every field has a default, so an empty (or absent) TOML file gives the standard setup:
//!
//! ```toml
//! output_dir = "Display"
//! field_threshold = 50
//! time_step = "h"
//!
//! [status_columns]
//! author = "from_user_id_str"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AnalysisResult;
use crate::ingestion::status_schema;
use crate::table::Granularity;
use crate::types::Schema;

/// Columns loaded when no column set is configured.
pub const DEFAULT_COLUMNS: &[&str] = &[
    "id_str",
    "from_user",
    "text",
    "created_at",
    "user_lang",
    "from_user_id_str",
    "in_reply_to_status_id_str",
    "source",
    "user_followers_count",
    "user_friends_count",
    "status_url",
    "entities_str",
];

/// Which column plays which role in the analyses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusColumns {
    /// Author id; the per-user grouping key.
    pub author: String,
    pub text: String,
    pub created_at: String,
    /// Id of the status being replied to; empty for non-replies.
    pub reply_target: String,
    /// Client application, markup stripped.
    pub source: String,
    pub language: String,
    /// JSON entities document (`hashtags`, `user_mentions`, ...).
    pub entities: String,
}

impl Default for StatusColumns {
    fn default() -> Self {
        Self {
            author: "from_user_id_str".to_string(),
            text: "text".to_string(),
            created_at: "created_at".to_string(),
            reply_target: "in_reply_to_status_id_str".to_string(),
            source: "source".to_string(),
            language: "user_lang".to_string(),
            entities: "entities_str".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Column set to load; other columns in the input are ignored.
    pub columns: Vec<String>,
    pub status_columns: StatusColumns,
    /// Directory the JSON results are written to.
    pub output_dir: PathBuf,
    /// Values seen fewer times than this are merged into `others` by field counts.
    pub field_threshold: u64,
    /// Bucket size when grouping by a timestamp column.
    pub time_step: Granularity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            status_columns: StatusColumns::default(),
            output_dir: PathBuf::from("Display"),
            field_threshold: 50,
            time_step: Granularity::Hour,
        }
    }
}

impl Config {
    /// Read a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> AnalysisResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Schema for the configured column set.
    pub fn schema(&self) -> Schema {
        status_schema(self.columns.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let cfg = Config::from_toml(
            r#"
            output_dir = "out"
            time_step = "D"

            [status_columns]
            author = "from_user"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.output_dir, PathBuf::from("out"));
        assert_eq!(cfg.time_step, Granularity::Day);
        assert_eq!(cfg.field_threshold, 50);
        assert_eq!(cfg.status_columns.author, "from_user");
        assert_eq!(cfg.status_columns.text, "text");
    }

    #[test]
    fn bad_time_step_is_a_config_error() {
        let err = Config::from_toml(r#"time_step = "fortnight""#).unwrap_err();
        assert!(err.to_string().starts_with("config error"));
    }

    #[test]
    fn default_schema_types_status_columns() {
        let schema = Config::default().schema();
        assert_eq!(schema.fields.len(), DEFAULT_COLUMNS.len());
        assert_eq!(schema.data_type_of("created_at"), Some(DataType::Timestamp));
        assert_eq!(
            schema.data_type_of("in_reply_to_status_id_str"),
            Some(DataType::Id)
        );
    }
}
