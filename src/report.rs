//! The standard battery of analyses, one JSON file each.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::AnalysisResult;
use crate::export::Exporter;
use crate::processing::{
    analyse_entities, analyse_field, analyse_interactions, analyse_relations, analyse_replies,
    analyse_reposts, analyse_types, analyse_types_by, GroupBy, StatusType,
};
use crate::types::{DataSet, Schema};

/// Outcome of [`run_all`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    /// Files written, in order.
    pub written: Vec<PathBuf>,
    /// `(file name, reason)` for analyses skipped because a column is not loaded.
    pub skipped: Vec<(String, String)>,
}

impl ReportSummary {
    fn missing(&mut self, file_name: &str, column: &str) {
        self.skipped.push((
            file_name.to_string(),
            format!("column '{column}' is not in the loaded column set"),
        ));
    }
}

/// Run every analysis the loaded columns allow and write the results with `exporter`.
///
/// | file | content |
/// |---|---|
/// | `types_per_user.json` | original/repost/reply per author |
/// | `sum_types.json` | totals of the above |
/// | `types_per_time.json` | original/repost/reply per time bucket |
/// | `relation_original_time.json` | originals per time bucket |
/// | `retweets_per_user.json` | reposts per author |
/// | `hashtags.json` | hashtag text counts |
/// | `mentions.json` | mentioned user id counts |
/// | `apps_count.json` | client application counts, thresholded |
/// | `languages.json` | language counts, thresholded |
/// | `replies_per_user.json` | replies per replied-to status |
/// | `interactions.json` | mentioned users per author |
///
/// Analyses whose columns were not loaded are skipped and listed in the summary; any other
/// failure aborts the run.
pub fn run_all(dataset: &DataSet, config: &Config, exporter: &Exporter) -> AnalysisResult<ReportSummary> {
    let cols = &config.status_columns;
    let schema = &dataset.schema;
    let mut summary = ReportSummary::default();

    let typed = [&cols.author, &cols.text, &cols.reply_target];
    match first_missing(schema, &typed) {
        Some(column) => {
            for name in ["types_per_user.json", "sum_types.json", "retweets_per_user.json"] {
                summary.missing(name, &column);
            }
        }
        None => {
            let types = analyse_types(dataset, cols)?;
            summary.written.push(exporter.write_counts("types_per_user.json", &types)?);
            summary.written.push(exporter.write_totals("sum_types.json", &types.totals())?);

            let reposts = analyse_reposts(dataset, cols)?;
            summary
                .written
                .push(exporter.write_counts("retweets_per_user.json", &reposts)?);
        }
    }

    match first_missing(schema, &[&cols.text, &cols.reply_target, &cols.created_at]) {
        Some(column) => {
            for name in ["types_per_time.json", "relation_original_time.json"] {
                summary.missing(name, &column);
            }
        }
        None => {
            let by_time = GroupBy::for_column(schema, &cols.created_at, config.time_step)?;
            let per_time = analyse_types_by(dataset, cols, &by_time)?;
            summary
                .written
                .push(exporter.write_counts("types_per_time.json", &per_time)?);

            let originals = analyse_relations(dataset, cols, &by_time, StatusType::Original)?;
            summary
                .written
                .push(exporter.write_counts("relation_original_time.json", &originals)?);
        }
    }

    match first_missing(schema, &[&cols.entities]) {
        Some(column) => {
            for name in ["hashtags.json", "mentions.json"] {
                summary.missing(name, &column);
            }
        }
        None => {
            let hashtags = analyse_entities(dataset, cols, "hashtags", "text")?;
            summary
                .written
                .push(exporter.write_frequencies("hashtags.json", &hashtags)?);

            let mentions = analyse_entities(dataset, cols, "user_mentions", "id_str")?;
            summary
                .written
                .push(exporter.write_frequencies("mentions.json", &mentions)?);
        }
    }

    for (name, column) in [("apps_count.json", &cols.source), ("languages.json", &cols.language)] {
        match first_missing(schema, &[column]) {
            Some(column) => summary.missing(name, &column),
            None => {
                let counts = analyse_field(dataset, column, config.field_threshold)?;
                summary.written.push(exporter.write_frequencies(name, &counts)?);
            }
        }
    }

    match first_missing(schema, &[&cols.reply_target]) {
        Some(column) => summary.missing("replies_per_user.json", &column),
        None => {
            let replies = analyse_replies(dataset, cols)?;
            summary
                .written
                .push(exporter.write_frequencies("replies_per_user.json", &replies)?);
        }
    }

    match first_missing(schema, &[&cols.author, &cols.entities]) {
        Some(column) => summary.missing("interactions.json", &column),
        None => {
            let interactions = analyse_interactions(dataset, cols)?;
            summary
                .written
                .push(exporter.write_interactions("interactions.json", &interactions)?);
        }
    }

    Ok(summary)
}

fn first_missing(schema: &Schema, needed: &[&String]) -> Option<String> {
    needed
        .iter()
        .find(|c| schema.index_of(c.as_str()).is_none())
        .map(|c| c.to_string())
}
