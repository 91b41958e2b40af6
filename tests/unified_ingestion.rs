use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use status_analytics::config::Config;
use status_analytics::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions};
use status_analytics::AnalysisError;

fn tmp_file(ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("status-analytics-unified-{nanos}.{ext}"))
}

#[test]
fn infers_format_from_extension() {
    let schema = Config::default().schema();
    let opts = IngestionOptions::default();

    let csv = ingest_from_path("tests/fixtures/statuses.csv", &schema, &opts).unwrap();
    let json = ingest_from_path("tests/fixtures/statuses.ndjson", &schema, &opts).unwrap();
    assert_eq!(csv.row_count(), 6);
    assert_eq!(csv, json);
}

#[test]
fn explicit_format_overrides_extension() {
    let path = tmp_file("dump");
    fs::copy("tests/fixtures/statuses.ndjson", &path).unwrap();

    let opts = IngestionOptions {
        format: Some(IngestionFormat::Json),
        ..Default::default()
    };
    let ds = ingest_from_path(&path, &Config::default().schema(), &opts).unwrap();
    assert_eq!(ds.row_count(), 6);
    let _ = fs::remove_file(path);
}

#[test]
fn unknown_extension_is_rejected() {
    let path = tmp_file("xlsx");
    let err = ingest_from_path(&path, &Config::default().schema(), &IngestionOptions::default())
        .unwrap_err();
    match err {
        AnalysisError::SchemaMismatch { message } => assert!(message.contains("xlsx")),
        other => panic!("expected SchemaMismatch, got: {other}"),
    }
}
