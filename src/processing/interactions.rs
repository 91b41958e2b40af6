//! Author → mentioned users.

use std::collections::BTreeMap;

use crate::config::StatusColumns;
use crate::error::AnalysisResult;
use crate::types::DataSet;

use super::entities::entity_values;

/// Author id → ids of every user mentioned in that author's statuses.
pub type Interactions = BTreeMap<String, Vec<String>>;

/// Collect `user_mentions[].id_str` per author.
///
/// Lists are concatenated in record order, then mention order within a record, with
/// duplicates kept. Authors whose statuses mention nobody map to an empty list; records
/// without an author are skipped.
pub fn analyse_interactions(dataset: &DataSet, columns: &StatusColumns) -> AnalysisResult<Interactions> {
    let author_idx = dataset.schema.require(&columns.author)?;
    let entities_idx = dataset.schema.require(&columns.entities)?;

    let mut out = Interactions::new();
    for (idx0, row) in dataset.rows.iter().enumerate() {
        let Some(author) = row[author_idx].to_label() else {
            continue;
        };
        let mentions = entity_values(idx0 + 1, &row[entities_idx], "user_mentions", "id_str")?;
        out.entry(author).or_default().extend(mentions);
    }
    Ok(out)
}
