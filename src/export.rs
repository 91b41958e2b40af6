//! JSON export of analysis results.
//!
//! Each result is serialised completely, then written in one call to
//! `<output_dir>/<file name>`. Tables are written as arrays of records, interactions as a
//! single object.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::AnalysisResult;
use crate::observability::{self, AnalysisObserver, ObservationContext, Severity, Stage};
use crate::processing::Interactions;
use crate::table::{CountTable, FrequencyTable, Totals};

/// Serialise `value` as JSON and write it to `path`, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> AnalysisResult<()> {
    let path = path.as_ref();
    let bytes = serde_json::to_vec(value)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Writes results into a fixed output directory and reports each write to an observer.
#[derive(Clone)]
pub struct Exporter {
    output_dir: PathBuf,
    observer: Option<Arc<dyn AnalysisObserver>>,
}

impl fmt::Debug for Exporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exporter")
            .field("output_dir", &self.output_dir)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            observer: None,
        }
    }

    /// Attach an observer for write outcomes. [`Severity::Critical`] failures (I/O) are also
    /// raised as alerts.
    pub fn with_observer(mut self, observer: Arc<dyn AnalysisObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// Write `value` to `file_name`; `records` is the count reported to the observer.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        file_name: &str,
        value: &T,
        records: usize,
    ) -> AnalysisResult<PathBuf> {
        let path = self.path_for(file_name);
        let ctx = ObservationContext {
            path: path.clone(),
            stage: Stage::Export,
        };
        let result = write_json(&path, value);
        observability::report(
            self.observer.as_ref(),
            Severity::Critical,
            &ctx,
            &result,
            |_| records,
        );
        result.map(|()| path)
    }

    /// `[{"<key>": key, "original": n, "repost": n, "reply": n}, ...]`, absent cells omitted.
    pub fn write_counts(&self, file_name: &str, table: &CountTable) -> AnalysisResult<PathBuf> {
        self.write(file_name, &table.records(), table.len())
    }

    /// `[{"type": "original", "count": n}, ...]`.
    pub fn write_totals(&self, file_name: &str, totals: &Totals) -> AnalysisResult<PathBuf> {
        self.write(file_name, totals, totals.0.len())
    }

    /// `[{"<key>": value, "count": n}, ...]`.
    pub fn write_frequencies(&self, file_name: &str, table: &FrequencyTable) -> AnalysisResult<PathBuf> {
        self.write(file_name, &table.records(), table.len())
    }

    /// `{"<author id>": ["<mentioned id>", ...], ...}`.
    pub fn write_interactions(
        &self,
        file_name: &str,
        interactions: &Interactions,
    ) -> AnalysisResult<PathBuf> {
        self.write(file_name, interactions, interactions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn tmp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("status-analytics-export-{nanos}"))
    }

    #[test]
    fn write_json_creates_missing_directories() {
        let dir = tmp_dir();
        let path = dir.join("nested").join("out.json");
        write_json(&path, &serde_json::json!({"a": [1, 2]})).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"a":[1,2]}"#);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn exporter_writes_under_output_dir() {
        let dir = tmp_dir();
        let exporter = Exporter::new(&dir);
        let mut interactions = Interactions::new();
        interactions.insert("u1".to_string(), vec!["2".to_string()]);

        let path = exporter
            .write_interactions("interactions.json", &interactions)
            .unwrap();
        assert_eq!(path, dir.join("interactions.json"));
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"u1":["2"]}"#);
        let _ = fs::remove_dir_all(dir);
    }
}
