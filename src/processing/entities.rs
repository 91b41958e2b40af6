//! Entity flattening and counting.
//!
//! The entities column holds one JSON document per status, e.g.
//! `{"hashtags": [{"text": "ai"}], "user_mentions": [{"id_str": "42", ...}]}`.

use crate::config::StatusColumns;
use crate::error::{AnalysisError, AnalysisResult};
use crate::table::{FrequencyTable, GroupKey};
use crate::types::{DataSet, Value};

/// Values of `field` in every object listed under `entity` in one entities document.
///
/// A null document or a missing `entity` list yields nothing. A non-list entity or an
/// object without `field` is a [`AnalysisError::SchemaMismatch`]. `row` is 1-based.
pub fn entity_values(
    row: usize,
    entities: &Value,
    entity: &str,
    field: &str,
) -> AnalysisResult<Vec<String>> {
    let doc = match entities {
        Value::Null => return Ok(Vec::new()),
        Value::Json(doc) => doc,
        other => {
            return Err(AnalysisError::schema(format!(
                "row {row}: entities must be a json document, got {other:?}"
            )));
        }
    };
    let Some(list) = doc.get(entity) else {
        return Ok(Vec::new());
    };
    let list = list.as_array().ok_or_else(|| {
        AnalysisError::schema(format!("row {row}: entity '{entity}' is not a list"))
    })?;

    list.iter()
        .map(|object| {
            object
                .get(field)
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .ok_or_else(|| {
                    AnalysisError::schema(format!(
                        "row {row}: '{entity}' entry has no field '{field}'"
                    ))
                })
        })
        .collect()
}

/// Count every `entity[].field` value across the whole dataset (e.g. `hashtags`/`text`).
///
/// The full distribution is kept; nothing is collapsed into `others`.
pub fn analyse_entities(
    dataset: &DataSet,
    columns: &StatusColumns,
    entity: &str,
    field: &str,
) -> AnalysisResult<FrequencyTable> {
    let mut counts = FrequencyTable::new(entity);
    for (idx0, cell) in dataset.column(&columns.entities)?.enumerate() {
        for value in entity_values(idx0 + 1, cell, entity, field)? {
            counts.increment(GroupKey::Text(value));
        }
    }
    Ok(counts)
}
