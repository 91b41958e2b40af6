//! Group-and-count aggregation.
//!
//! One aggregator, [`group_count_by`], parameterised by a key-extraction function.
//! [`GroupBy`] supplies the two standard extractors: raw column values, or a timestamp
//! column truncated to a [`Granularity`].

use crate::config::StatusColumns;
use crate::error::{AnalysisError, AnalysisResult};
use crate::table::{CountTable, Granularity, GroupKey, TimeBucket};
use crate::types::{DataSet, DataType, Schema, Value};

use super::classify::{Classifier, StatusType};

/// How records are assigned to groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupBy {
    /// Group by the raw values of a column.
    Column(String),
    /// Group by the time bucket a timestamp column falls into.
    Time {
        column: String,
        granularity: Granularity,
    },
}

impl GroupBy {
    pub fn column(name: impl Into<String>) -> Self {
        GroupBy::Column(name.into())
    }

    pub fn time(name: impl Into<String>, granularity: Granularity) -> Self {
        GroupBy::Time {
            column: name.into(),
            granularity,
        }
    }

    /// Pick the strategy from the column type: timestamp columns are bucketed by `step`,
    /// everything else is grouped by raw value.
    pub fn for_column(schema: &Schema, name: &str, step: Granularity) -> AnalysisResult<Self> {
        schema.require(name)?;
        Ok(match schema.data_type_of(name) {
            Some(DataType::Timestamp) => GroupBy::time(name, step),
            _ => GroupBy::column(name),
        })
    }

    /// Name of the grouped column, used as the key name of result tables.
    pub fn key_name(&self) -> &str {
        match self {
            GroupBy::Column(column) | GroupBy::Time { column, .. } => column,
        }
    }

    /// Resolve against a schema into a row → key function.
    ///
    /// Rows whose key cell is null are not assigned to any group.
    pub fn extractor(&self, schema: &Schema) -> AnalysisResult<impl Fn(&[Value]) -> Option<GroupKey>> {
        let idx = schema.require(self.key_name())?;
        let granularity = match self {
            GroupBy::Column(_) => None,
            GroupBy::Time {
                column,
                granularity,
            } => {
                if schema.data_type_of(column) != Some(DataType::Timestamp) {
                    return Err(AnalysisError::schema(format!(
                        "cannot bucket column '{column}' by time: it is not a timestamp column"
                    )));
                }
                Some(*granularity)
            }
        };

        Ok(move |row: &[Value]| {
            let cell = &row[idx];
            match granularity {
                Some(g) => cell
                    .as_timestamp()
                    .map(|ts| GroupKey::from(TimeBucket::containing(ts, g))),
                None => GroupKey::from_value(cell),
            }
        })
    }
}

/// Count, per group, how many records fall in each of `columns`.
///
/// Groups appear for every record with a non-null key, even if none of its records land in
/// a requested column; cells that would be zero are absent. Rows are ordered by key.
pub fn group_count_by<K>(
    dataset: &DataSet,
    key_name: &str,
    columns: &[StatusType],
    classifier: &Classifier,
    key_fn: K,
) -> CountTable
where
    K: Fn(&[Value]) -> Option<GroupKey>,
{
    dataset.reduce_rows(CountTable::new(key_name, columns), |mut table, row| {
        if let Some(key) = key_fn(row) {
            table.increment(key, classifier.classify_row(row));
        }
        table
    })
}

/// [`group_count_by`] with a [`GroupBy`] extractor.
pub fn group_count(
    dataset: &DataSet,
    group_by: &GroupBy,
    columns: &[StatusType],
    status_columns: &StatusColumns,
) -> AnalysisResult<CountTable> {
    let classifier = Classifier::new(&dataset.schema, status_columns)?;
    let key_fn = group_by.extractor(&dataset.schema)?;
    Ok(group_count_by(
        dataset,
        group_by.key_name(),
        columns,
        &classifier,
        key_fn,
    ))
}

/// Original/repost/reply counts per author.
pub fn analyse_types(dataset: &DataSet, columns: &StatusColumns) -> AnalysisResult<CountTable> {
    analyse_types_by(dataset, columns, &GroupBy::column(&columns.author))
}

/// Original/repost/reply counts per value of any field, or per time bucket.
pub fn analyse_types_by(
    dataset: &DataSet,
    columns: &StatusColumns,
    group_by: &GroupBy,
) -> AnalysisResult<CountTable> {
    group_count(dataset, group_by, &StatusType::ALL, columns)
}

/// Counts of a single status type per group.
///
/// Every group is listed; groups without any status of that type have no cell.
pub fn analyse_relations(
    dataset: &DataSet,
    columns: &StatusColumns,
    group_by: &GroupBy,
    status: StatusType,
) -> AnalysisResult<CountTable> {
    group_count(dataset, group_by, &[status], columns)
}

/// Repost counts per author.
pub fn analyse_reposts(dataset: &DataSet, columns: &StatusColumns) -> AnalysisResult<CountTable> {
    analyse_relations(
        dataset,
        columns,
        &GroupBy::column(&columns.author),
        StatusType::Repost,
    )
}
