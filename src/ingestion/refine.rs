//! Cell refinement shared by the CSV and JSON loaders.
//!
//! Raw cells are turned into typed [`Value`]s here: numbers and booleans are parsed,
//! timestamps normalised to UTC, entity documents decoded and client markup stripped.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{DataType, Value};

static SOURCE_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.+>(.*)</.+>").expect("source markup pattern is valid"));

/// Status API form, e.g. `Sun Jan 03 00:43:42 +0000 2016`.
const API_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Cell texts that mean "no value" in exported datasets. Free text ([`DataType::Utf8`]) is
/// exempt, so a status reading `NA` is kept.
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

/// Parse one raw text cell according to `data_type`.
///
/// Empty cells are [`Value::Null`] for every type, and so are missing-value markers
/// (`NaN`, `NA`, `null`, ...) for every type but [`DataType::Utf8`]. `row` is the 1-based
/// row number reported in errors.
pub fn parse_text_cell(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> AnalysisResult<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    let fail = |message: String| AnalysisError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };
    let trimmed = raw.trim();
    if data_type != DataType::Utf8 && is_missing_marker(trimmed) {
        return Ok(Value::Null);
    }

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(raw.to_owned())),
        DataType::Id => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| fail(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(float_value)
            .map_err(|e| fail(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(fail),
        DataType::Timestamp => parse_timestamp(trimmed).map(Value::Timestamp).map_err(fail),
        DataType::Json => serde_json::from_str::<serde_json::Value>(raw)
            .map(Value::Json)
            .map_err(|e| fail(e.to_string())),
        DataType::Markup => strip_markup(raw)
            .map(|inner| Value::Utf8(inner.to_owned()))
            .ok_or_else(|| fail("expected markup of the form <tag>value</tag>".to_string())),
    }
}

pub fn is_missing_marker(s: &str) -> bool {
    MISSING_MARKERS.contains(&s)
}

/// `NaN` has no meaning as a count or identifier, so it is loaded as an explicit null.
pub fn float_value(v: f64) -> Value {
    if v.is_nan() { Value::Null } else { Value::Float64(v) }
}

/// Extract the inner value of a `<tag ...>value</tag>` fragment.
pub fn strip_markup(raw: &str) -> Option<&str> {
    SOURCE_MARKUP
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse a timestamp in one of the accepted export formats, normalised to UTC.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, API_FORMAT) {
        return Ok(dt.naive_utc());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| "unrecognised timestamp format".to_string())
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}
