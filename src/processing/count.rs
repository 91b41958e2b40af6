//! Single-column frequency counts.

use crate::config::StatusColumns;
use crate::error::AnalysisResult;
use crate::table::{CountKey, FrequencyTable, GroupKey};
use crate::types::DataSet;

/// Count the raw values of one column.
///
/// Every record is counted once: null cells under [`CountKey::Missing`], so the total equals
/// the row count.
pub fn count_field(dataset: &DataSet, field: &str) -> AnalysisResult<FrequencyTable> {
    let mut counts = FrequencyTable::new(field);
    for cell in dataset.column(field)? {
        match GroupKey::from_value(cell) {
            Some(key) => counts.increment(key),
            None => counts.increment(CountKey::Missing),
        }
    }
    Ok(counts)
}

/// Count the values of one column, merging those seen fewer than `threshold` times into
/// `others`.
///
/// Used for long-tailed fields such as the client application or language.
pub fn analyse_field(dataset: &DataSet, field: &str, threshold: u64) -> AnalysisResult<FrequencyTable> {
    Ok(count_field(dataset, field)?.refine_counts(threshold))
}

/// Number of replies received by each replied-to status.
///
/// Records without a reply target are not replies and are skipped.
pub fn analyse_replies(dataset: &DataSet, columns: &StatusColumns) -> AnalysisResult<FrequencyTable> {
    let mut counts = FrequencyTable::new(columns.reply_target.as_str());
    for key in dataset
        .column(&columns.reply_target)?
        .filter_map(GroupKey::from_value)
    {
        counts.increment(key);
    }
    Ok(counts)
}
