//! Observer hooks for loading and export outcomes.
//!
//! Library code never logs directly: it reports to an optional [`AnalysisObserver`], and the
//! caller decides where events go ([`LogObserver`] for the `log` facade, [`FileObserver`] for
//! an append-only file, [`CompositeObserver`] for both).

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::AnalysisError;
use crate::ingestion::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O failures).
    Critical,
}

impl Severity {
    /// Severity of a failed operation.
    ///
    /// I/O problems (missing input, unwritable output) are `Critical`; bad data is `Error`.
    pub fn for_error(e: &AnalysisError) -> Self {
        match e {
            AnalysisError::Io(_) => Severity::Critical,
            AnalysisError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Severity::Critical,
                _ => Severity::Error,
            },
            AnalysisError::Json(err) if err.is_io() => Severity::Critical,
            AnalysisError::Json(_)
            | AnalysisError::Config(_)
            | AnalysisError::SchemaMismatch { .. }
            | AnalysisError::ParseError { .. } => Severity::Error,
        }
    }
}

/// Which step of a run produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Loading a dataset in the given format.
    Ingest(IngestionFormat),
    /// Writing an analysis result.
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ingest(format) => write!(f, "ingest[{format:?}]"),
            Stage::Export => f.write_str("export"),
        }
    }
}

/// Context about an observed operation.
#[derive(Debug, Clone)]
pub struct ObservationContext {
    /// Input or output path.
    pub path: PathBuf,
    pub stage: Stage,
}

/// Stats reported on success: rows loaded, or records written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationStats {
    pub rows: usize,
}

/// Observer interface for load/export outcomes.
pub trait AnalysisObserver: Send + Sync {
    /// Called when the operation succeeds.
    fn on_success(&self, _ctx: &ObservationContext, _stats: ObservationStats) {}

    /// Called when the operation fails.
    fn on_failure(&self, _ctx: &ObservationContext, _severity: Severity, _error: &AnalysisError) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ObservationContext, severity: Severity, error: &AnalysisError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Report `result` to `observer` (when set), alerting at or above `alert_at_or_above`.
pub(crate) fn report<T>(
    observer: Option<&Arc<dyn AnalysisObserver>>,
    alert_at_or_above: Severity,
    ctx: &ObservationContext,
    result: &Result<T, AnalysisError>,
    rows: impl FnOnce(&T) -> usize,
) {
    let Some(obs) = observer else {
        return;
    };
    match result {
        Ok(v) => obs.on_success(ctx, ObservationStats { rows: rows(v) }),
        Err(e) => {
            let sev = Severity::for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn AnalysisObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn AnalysisObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl AnalysisObserver for CompositeObserver {
    fn on_success(&self, ctx: &ObservationContext, stats: ObservationStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ObservationContext, severity: Severity, error: &AnalysisError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ObservationContext, severity: Severity, error: &AnalysisError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default)]
pub struct LogObserver;

impl AnalysisObserver for LogObserver {
    fn on_success(&self, ctx: &ObservationContext, stats: ObservationStats) {
        log::info!("{} ok path={} rows={}", ctx.stage, ctx.path.display(), stats.rows);
    }

    fn on_failure(&self, ctx: &ObservationContext, severity: Severity, error: &AnalysisError) {
        log::error!(
            "{} failed severity={:?} path={} err={}",
            ctx.stage,
            severity,
            ctx.path.display(),
            error
        );
    }

    fn on_alert(&self, ctx: &ObservationContext, severity: Severity, error: &AnalysisError) {
        log::error!(
            "ALERT {} severity={:?} path={} err={}",
            ctx.stage,
            severity,
            ctx.path.display(),
            error
        );
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", chrono::Utc::now().to_rfc3339());
        }
    }
}

impl AnalysisObserver for FileObserver {
    fn on_success(&self, ctx: &ObservationContext, stats: ObservationStats) {
        self.append_line(&format!(
            "ok stage={} path={} rows={}",
            ctx.stage,
            ctx.path.display(),
            stats.rows
        ));
    }

    fn on_failure(&self, ctx: &ObservationContext, severity: Severity, error: &AnalysisError) {
        self.append_line(&format!(
            "fail severity={:?} stage={} path={} err={}",
            severity,
            ctx.stage,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &ObservationContext, severity: Severity, error: &AnalysisError) {
        self.append_line(&format!(
            "ALERT severity={:?} stage={} path={} err={}",
            severity,
            ctx.stage,
            ctx.path.display(),
            error
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_failures_are_critical() {
        let io = AnalysisError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(Severity::for_error(&io), Severity::Critical);
        assert_eq!(
            Severity::for_error(&AnalysisError::schema("missing")),
            Severity::Error
        );
    }

    #[test]
    fn file_observer_appends_lines() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("status-analytics-observer-{nanos}.log"));
        let obs = FileObserver::new(&path);
        let ctx = ObservationContext {
            path: PathBuf::from("Display/hashtags.json"),
            stage: Stage::Export,
        };

        obs.on_success(&ctx, ObservationStats { rows: 4 });
        obs.on_failure(&ctx, Severity::Error, &AnalysisError::schema("boom"));

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("ok stage=export path=Display/hashtags.json rows=4"));
        assert!(lines[1].contains("fail severity=Error"));
        let _ = std::fs::remove_file(path);
    }
}
