use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;
use status_analytics::config::Config;
use status_analytics::export::Exporter;
use status_analytics::ingestion::csv::ingest_csv_from_path;
use status_analytics::report::run_all;

fn tmp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("status-analytics-report-{tag}-{nanos}"))
}

fn read_json(path: impl AsRef<Path>) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn run_all_writes_every_file() {
    let dir = tmp_dir("all");
    let config = Config {
        field_threshold: 2,
        ..Config::default()
    };
    let ds = ingest_csv_from_path("tests/fixtures/statuses.csv", &config.schema()).unwrap();
    let exporter = Exporter::new(&dir);

    let summary = run_all(&ds, &config, &exporter).unwrap();
    assert!(summary.skipped.is_empty());

    let mut names: Vec<_> = summary
        .written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "apps_count.json",
            "hashtags.json",
            "interactions.json",
            "languages.json",
            "mentions.json",
            "relation_original_time.json",
            "replies_per_user.json",
            "retweets_per_user.json",
            "sum_types.json",
            "types_per_time.json",
            "types_per_user.json",
        ]
    );
    for path in &summary.written {
        assert!(path.starts_with(&dir));
        assert!(path.exists());
    }

    assert_eq!(
        read_json(dir.join("sum_types.json")),
        json!([
            {"type": "original", "count": 3},
            {"type": "repost", "count": 1},
            {"type": "reply", "count": 2},
        ])
    );
    assert_eq!(
        read_json(dir.join("languages.json")),
        json!([{"user_lang": "en", "count": 4}, {"user_lang": "fr", "count": 2}])
    );
    assert_eq!(
        read_json(dir.join("types_per_time.json"))[1],
        json!({"created_at": "2016-01-03 01:00", "reply": 2})
    );

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn run_all_skips_analyses_without_their_columns() {
    let dir = tmp_dir("partial");
    let config = Config {
        columns: vec![
            "id_str".to_string(),
            "from_user_id_str".to_string(),
            "text".to_string(),
            "in_reply_to_status_id_str".to_string(),
            "user_lang".to_string(),
        ],
        ..Config::default()
    };
    let ds = ingest_csv_from_path("tests/fixtures/statuses.csv", &config.schema()).unwrap();

    let summary = run_all(&ds, &config, &Exporter::new(&dir)).unwrap();

    let skipped: Vec<_> = summary.skipped.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        skipped,
        vec![
            "types_per_time.json",
            "relation_original_time.json",
            "hashtags.json",
            "mentions.json",
            "apps_count.json",
            "interactions.json",
        ]
    );
    assert!(summary.skipped[0].1.contains("created_at"));
    assert_eq!(summary.written.len(), 5);
    assert!(dir.join("types_per_user.json").exists());
    assert!(!dir.join("hashtags.json").exists());

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn run_all_is_repeatable() {
    let dir = tmp_dir("repeat");
    let config = Config::default();
    let ds = ingest_csv_from_path("tests/fixtures/statuses.csv", &config.schema()).unwrap();
    let exporter = Exporter::new(&dir);

    run_all(&ds, &config, &exporter).unwrap();
    let first = read_json(dir.join("types_per_user.json"));
    run_all(&ds, &config, &exporter).unwrap();
    assert_eq!(read_json(dir.join("types_per_user.json")), first);

    let _ = fs::remove_dir_all(dir);
}
