//! JSON loading implementation.
//!
//! Supported inputs:
//! - A JSON array of status objects: `[{"id_str":"1"}, {"id_str":"2"}]`
//! - Newline-delimited JSON (NDJSON): `{"id_str":"1"}\n{"id_str":"2"}\n`
//!
//! Nested fields are supported using dot paths in schema field names (e.g. `user.id_str`).
//! A [`DataType::Json`] field accepts either an embedded object or a JSON-encoded string,
//! so API dumps and flattened exports load the same way.

use std::fs;
use std::path::Path;

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{DataSet, DataType, Schema, Value};

use super::refine::{float_value, parse_text_cell};

/// Load a JSON export into an in-memory `DataSet`.
pub fn ingest_json_from_path(path: impl AsRef<Path>, schema: &Schema) -> AnalysisResult<DataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text, schema)
}

/// Load JSON from an in-memory string into a [`DataSet`].
pub fn ingest_json_from_str(input: &str, schema: &Schema) -> AnalysisResult<DataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::schema("json input is empty"));
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => ingest_json_values(&items, schema),
            serde_json::Value::Object(_) => ingest_json_values(std::slice::from_ref(&v), schema),
            _ => Err(AnalysisError::schema(
                "json must be an object, an array of objects, or NDJSON",
            )),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
                AnalysisError::schema(format!("invalid ndjson at line {}: {}", i + 1, e))
            })?;
            values.push(v);
        }
        ingest_json_values(&values, schema)
    }
}

fn ingest_json_values(values: &[serde_json::Value], schema: &Schema) -> AnalysisResult<DataSet> {
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(values.len());

    for (idx0, v) in values.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = v
            .as_object()
            .ok_or_else(|| AnalysisError::schema(format!("row {row_num} is not a json object")))?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let jv = get_by_dot_path(obj, &field.name).ok_or_else(|| {
                AnalysisError::schema(format!(
                    "row {row_num} missing required field '{}'",
                    field.name
                ))
            })?;
            row.push(convert_json_value(row_num, &field.name, field.data_type, jv)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn get_by_dot_path<'a>(
    root: &'a serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Option<&'a serde_json::Value> {
    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn convert_json_value(
    row: usize,
    column: &str,
    data_type: DataType,
    v: &serde_json::Value,
) -> AnalysisResult<Value> {
    if v.is_null() {
        return Ok(Value::Null);
    }
    let mismatch = |message: &str| AnalysisError::ParseError {
        row,
        column: column.to_string(),
        raw: v.to_string(),
        message: message.to_string(),
    };

    match (data_type, v) {
        // Strings go through the same refinement as CSV cells.
        (_, serde_json::Value::String(s)) => parse_text_cell(row, column, data_type, s),
        (DataType::Json, other) => Ok(Value::Json(other.clone())),
        (DataType::Bool, serde_json::Value::Bool(b)) => Ok(Value::Bool(*b)),
        (DataType::Int64, serde_json::Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int64(i))
            } else if let Some(u) = n.as_u64() {
                i64::try_from(u)
                    .map(Value::Int64)
                    .map_err(|_| mismatch("u64 out of range for i64"))
            } else {
                Err(mismatch("expected integer number"))
            }
        }
        (DataType::Float64, serde_json::Value::Number(n)) => n
            .as_f64()
            .map(float_value)
            .ok_or_else(|| mismatch("expected number")),
        // Numeric identifiers are common in API dumps; keep their decimal text.
        (DataType::Utf8 | DataType::Id, serde_json::Value::Number(n)) => {
            Ok(Value::Utf8(n.to_string()))
        }
        (DataType::Bool, _) => Err(mismatch("expected bool")),
        (DataType::Int64, _) => Err(mismatch("expected integer number")),
        (DataType::Float64, _) => Err(mismatch("expected number")),
        (DataType::Utf8 | DataType::Id | DataType::Timestamp | DataType::Markup, _) => {
            Err(mismatch("expected string"))
        }
    }
}
