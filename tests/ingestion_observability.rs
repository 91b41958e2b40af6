use std::sync::{Arc, Mutex};

use status_analytics::export::Exporter;
use status_analytics::ingestion::{ingest_from_path, status_schema, IngestionFormat, IngestionOptions};
use status_analytics::observability::{
    AnalysisObserver, ObservationContext, ObservationStats, Severity, Stage,
};
use status_analytics::processing::Interactions;
use status_analytics::AnalysisError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(Stage, usize)>>,
    failures: Mutex<Vec<Severity>>,
    alerts: Mutex<Vec<Severity>>,
}

impl AnalysisObserver for RecordingObserver {
    fn on_success(&self, ctx: &ObservationContext, stats: ObservationStats) {
        self.successes.lock().unwrap().push((ctx.stage, stats.rows));
    }

    fn on_failure(&self, _ctx: &ObservationContext, severity: Severity, _error: &AnalysisError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &ObservationContext, severity: Severity, _error: &AnalysisError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options(obs: &Arc<RecordingObserver>, alert_at_or_above: Severity) -> IngestionOptions {
    IngestionOptions {
        format: Some(IngestionFormat::Csv),
        observer: Some(obs.clone()),
        alert_at_or_above,
    }
}

#[test]
fn observer_receives_success_with_row_count() {
    let obs = Arc::new(RecordingObserver::default());
    let schema = status_schema(&["id_str", "text"]);

    let ds = ingest_from_path("tests/fixtures/statuses.csv", &schema, &options(&obs, Severity::Critical))
        .unwrap();

    assert_eq!(ds.row_count(), 6);
    assert_eq!(
        obs.successes.lock().unwrap().clone(),
        vec![(Stage::Ingest(IngestionFormat::Csv), 6)]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let schema = status_schema(&["id_str"]);

    // Missing file -> Io error -> Critical
    let _ = ingest_from_path(
        "tests/fixtures/does_not_exist.csv",
        &schema,
        &options(&obs, Severity::Critical),
    )
    .unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![Severity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![Severity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_non_critical_error() {
    let obs = Arc::new(RecordingObserver::default());
    let schema = status_schema(&["definitely_missing"]);

    // Schema mismatch -> Error severity (not Critical) -> should not alert
    let _ = ingest_from_path(
        "tests/fixtures/statuses.csv",
        &schema,
        &options(&obs, Severity::Critical),
    )
    .unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![Severity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn lower_alert_threshold_alerts_on_schema_errors() {
    let obs = Arc::new(RecordingObserver::default());
    let schema = status_schema(&["definitely_missing"]);

    let _ = ingest_from_path(
        "tests/fixtures/statuses.csv",
        &schema,
        &options(&obs, Severity::Error),
    )
    .unwrap_err();

    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![Severity::Error]);
}

#[test]
fn exporter_reports_written_records() {
    let obs = Arc::new(RecordingObserver::default());
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("status-analytics-observed-{nanos}"));
    let exporter = Exporter::new(&dir).with_observer(obs.clone());

    let mut interactions = Interactions::new();
    interactions.insert("111".to_string(), vec!["222".to_string()]);
    interactions.insert("222".to_string(), Vec::new());
    exporter
        .write_interactions("interactions.json", &interactions)
        .unwrap();

    assert_eq!(obs.successes.lock().unwrap().clone(), vec![(Stage::Export, 2)]);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn exporter_alerts_on_unwritable_output_dir() {
    let obs = Arc::new(RecordingObserver::default());
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    // A plain file where the output directory should be.
    let blocker = std::env::temp_dir().join(format!("status-analytics-blocker-{nanos}"));
    std::fs::write(&blocker, b"").unwrap();
    let exporter = Exporter::new(&blocker).with_observer(obs.clone());

    let err = exporter
        .write_interactions("interactions.json", &Interactions::new())
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Io(_)));
    assert_eq!(obs.failures.lock().unwrap().clone(), vec![Severity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![Severity::Critical]);
    let _ = std::fs::remove_file(blocker);
}
