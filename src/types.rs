//! Core data model types for loading.
//!
//! A status export is loaded into an in-memory [`DataSet`], using a [`Schema`] (a list of
//! typed [`Field`]s) that selects and types the columns of interest.

use chrono::NaiveDateTime;

use crate::error::{AnalysisError, AnalysisResult};

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number. `NaN` is loaded as [`Value::Null`].
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string, kept verbatim.
    Utf8,
    /// Identifier text (status or user id). Trimmed; missing-value markers such as `NaN`,
    /// `NA` or `null` load as [`Value::Null`].
    Id,
    /// Point in time, normalised to UTC.
    Timestamp,
    /// JSON document encoded in the cell (e.g. status entities).
    Json,
    /// Two-tag markup fragment (`<a ...>value</a>`); only the inner value is kept.
    Markup,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A list of fields describing the expected shape of incoming data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Like [`Self::index_of`], but a missing field is a [`AnalysisError::SchemaMismatch`].
    pub fn require(&self, name: &str) -> AnalysisResult<usize> {
        self.index_of(name).ok_or_else(|| {
            AnalysisError::schema(format!(
                "missing required column '{name}'. columns={:?}",
                self.field_names().collect::<Vec<_>>()
            ))
        })
    }

    /// Data type of a field by name, if present.
    pub fn data_type_of(&self, name: &str) -> Option<DataType> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.data_type)
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float (never `NaN`).
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// UTC timestamp.
    Timestamp(NaiveDateTime),
    /// Decoded JSON document.
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the string payload of a [`Value::Utf8`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Render a non-null value as the text used for identifiers and labels.
    ///
    /// Returns `None` for [`Value::Null`].
    pub fn to_label(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Int64(v) => Some(v.to_string()),
            Value::Float64(v) => Some(v.to_string()),
            Value::Bool(v) => Some(v.to_string()),
            Value::Utf8(s) => Some(s.clone()),
            Value::Timestamp(ts) => Some(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
            Value::Json(v) => Some(match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterate the values of one column by name.
    pub fn column(&self, name: &str) -> AnalysisResult<impl Iterator<Item = &Value>> {
        let idx = self.schema.require(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Reduce (fold) all rows into an accumulator value.
    ///
    /// This is similar to `Iterator::fold`, but provides each row as `&[Value]`.
    pub fn reduce_rows<A, F>(&self, init: A, mut reducer: F) -> A
    where
        F: FnMut(A, &[Value]) -> A,
    {
        self.rows
            .iter()
            .fold(init, |acc, row| reducer(acc, row.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id_str", DataType::Utf8),
            Field::new("user_followers_count", DataType::Int64),
        ]);
        DataSet::new(
            schema,
            vec![
                vec![Value::Utf8("1".to_string()), Value::Int64(10)],
                vec![Value::Utf8("2".to_string()), Value::Null],
            ],
        )
    }

    #[test]
    fn schema_require_reports_known_columns() {
        let ds = sample_dataset();
        assert_eq!(ds.schema.require("user_followers_count").unwrap(), 1);

        let msg = ds.schema.require("text").unwrap_err().to_string();
        assert!(msg.contains("missing required column 'text'"));
        assert!(msg.contains("id_str"));
    }

    #[test]
    fn column_iterates_in_row_order() {
        let ds = sample_dataset();
        let col: Vec<_> = ds.column("user_followers_count").unwrap().cloned().collect();
        assert_eq!(col, vec![Value::Int64(10), Value::Null]);
    }

    #[test]
    fn reduce_rows_folds_every_row() {
        let ds = sample_dataset();
        let nulls = ds.reduce_rows(0, |acc, row| acc + row.iter().filter(|v| v.is_null()).count());
        assert_eq!(nulls, 1);
    }

    #[test]
    fn json_string_labels_are_unquoted() {
        assert_eq!(
            Value::Json(serde_json::json!("42")).to_label(),
            Some("42".to_string())
        );
        assert_eq!(Value::Json(serde_json::json!(42)).to_label(), Some("42".to_string()));
        assert_eq!(Value::Null.to_label(), None);
    }
}
