mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use status_analytics::config::Config;
use status_analytics::export::Exporter;
use status_analytics::ingestion::{ingest_from_path, IngestionOptions};
use status_analytics::observability::{AnalysisObserver, CompositeObserver, FileObserver, LogObserver};
use status_analytics::processing::{
    analyse_entities, analyse_field, analyse_interactions, analyse_relations, analyse_replies,
    analyse_types_by, GroupBy,
};
use status_analytics::report;
use status_analytics::types::DataSet;

use cli::{Command, Opts};

type Void = Result<(), Box<dyn std::error::Error>>;

fn main() -> Void {
    let opts = Opts::parse();
    let _ = cli::init_logging(opts.verbose);

    let mut config = match &opts.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dir) = opts.output_dir {
        config.output_dir = dir;
    }

    let observer: Arc<dyn AnalysisObserver> = match &opts.log_file {
        Some(path) => Arc::new(CompositeObserver::new(vec![
            Arc::new(LogObserver) as Arc<dyn AnalysisObserver>,
            Arc::new(FileObserver::new(path)),
        ])),
        None => Arc::new(LogObserver),
    };
    let exporter = Exporter::new(&config.output_dir).with_observer(observer.clone());
    let load = |data: &Path| -> Result<DataSet, Box<dyn std::error::Error>> {
        let options = IngestionOptions {
            observer: Some(observer.clone()),
            ..Default::default()
        };
        let ds = ingest_from_path(data, &config.schema(), &options)?;
        log::info!("{} statuses loaded from {}", ds.row_count(), data.display());
        Ok(ds)
    };
    let cols = &config.status_columns;

    match &opts.command {
        Command::All { data } => {
            let ds = load(data.as_path())?;
            let summary = report::run_all(&ds, &config, &exporter)?;
            for (file_name, reason) in &summary.skipped {
                log::warn!("skipped {file_name}: {reason}");
            }
            log::info!(
                "{} files written to {}",
                summary.written.len(),
                config.output_dir.display()
            );
        }
        Command::Types { data, by, step } => {
            let ds = load(data.as_path())?;
            let key = by.as_deref().unwrap_or(&cols.author);
            let group_by =
                GroupBy::for_column(&ds.schema, key, step.unwrap_or(config.time_step))?;
            let table = analyse_types_by(&ds, cols, &group_by)?;
            if by.is_none() {
                exporter.write_counts("types_per_user.json", &table)?;
                exporter.write_totals("sum_types.json", &table.totals())?;
            } else {
                exporter.write_counts(&format!("types_per_{key}.json"), &table)?;
            }
        }
        Command::Relations {
            data,
            status,
            by,
            step,
        } => {
            let ds = load(data.as_path())?;
            let key = by.as_deref().unwrap_or(&cols.created_at);
            let group_by =
                GroupBy::for_column(&ds.schema, key, step.unwrap_or(config.time_step))?;
            let table = analyse_relations(&ds, cols, &group_by, *status)?;
            exporter.write_counts(&format!("relation_{status}_{key}.json"), &table)?;
        }
        Command::Field {
            data,
            field,
            threshold,
        } => {
            let ds = load(data.as_path())?;
            let counts = analyse_field(&ds, field, threshold.unwrap_or(config.field_threshold))?;
            exporter.write_frequencies(&format!("{field}_count.json"), &counts)?;
        }
        Command::Entities {
            data,
            entity,
            field,
        } => {
            let ds = load(data.as_path())?;
            let counts = analyse_entities(&ds, cols, entity, field)?;
            exporter.write_frequencies(&format!("{entity}.json"), &counts)?;
        }
        Command::Replies { data } => {
            let ds = load(data.as_path())?;
            exporter.write_frequencies("replies_per_user.json", &analyse_replies(&ds, cols)?)?;
        }
        Command::Interactions { data } => {
            let ds = load(data.as_path())?;
            exporter.write_interactions("interactions.json", &analyse_interactions(&ds, cols)?)?;
        }
    }

    Ok(())
}
