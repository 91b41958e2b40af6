//! Result tables produced by the analyses.
//!
//! Tables are sparse: a (group, category) pair that never occurred has no entry rather than
//! a zero. Consumers must treat "absent" and "zero" the same; [`CountTable::densified`]
//! fills the zeros in for callers that want a dense contract.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::processing::classify::StatusType;
use crate::types::Value;

/// Size of the time buckets used when grouping by a timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Granularity {
    Minute,
    #[default]
    Hour,
    Day,
    /// Monday to Sunday.
    Week,
    Month,
    Year,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }

    /// Start of the bucket containing `ts`.
    pub fn truncate(self, ts: NaiveDateTime) -> NaiveDateTime {
        let midnight = ts.date().and_time(chrono::NaiveTime::MIN);
        let into_hour = TimeDelta::seconds(i64::from(ts.minute() * 60 + ts.second()))
            + TimeDelta::nanoseconds(i64::from(ts.nanosecond()));
        match self {
            Granularity::Minute => {
                ts - TimeDelta::seconds(i64::from(ts.second()))
                    - TimeDelta::nanoseconds(i64::from(ts.nanosecond()))
            }
            Granularity::Hour => ts - into_hour,
            Granularity::Day => midnight,
            Granularity::Week => {
                midnight - TimeDelta::days(i64::from(ts.weekday().num_days_from_monday()))
            }
            Granularity::Month => midnight - TimeDelta::days(i64::from(ts.day0())),
            Granularity::Year => midnight - TimeDelta::days(i64::from(ts.ordinal0())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts full names and the period aliases used by dataframe libraries
/// (`min`/`T`, `h`/`H`, `D`, `W`, `M`, `Y`/`A`).
impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" | "T" => return Ok(Granularity::Minute),
            "M" => return Ok(Granularity::Month),
            _ => {}
        }
        match s.to_ascii_lowercase().as_str() {
            "minute" => Ok(Granularity::Minute),
            "h" | "hour" => Ok(Granularity::Hour),
            "d" | "day" => Ok(Granularity::Day),
            "w" | "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "y" | "a" | "year" => Ok(Granularity::Year),
            _ => Err(format!("unknown time step '{s}' (expected min, h, D, W, M or Y)")),
        }
    }
}

impl Serialize for Granularity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Granularity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One time bucket: the truncated start instant plus its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeBucket {
    pub start: NaiveDateTime,
    pub granularity: Granularity,
}

impl TimeBucket {
    pub fn containing(ts: NaiveDateTime, granularity: Granularity) -> Self {
        Self {
            start: granularity.truncate(ts),
            granularity,
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start;
        match self.granularity {
            Granularity::Minute => write!(f, "{}", start.format("%Y-%m-%d %H:%M")),
            Granularity::Hour => write!(f, "{}", start.format("%Y-%m-%d %H:00")),
            Granularity::Day => write!(f, "{}", start.format("%Y-%m-%d")),
            Granularity::Week => {
                let end = start + TimeDelta::days(6);
                write!(f, "{}/{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }
            Granularity::Month => write!(f, "{}", start.format("%Y-%m")),
            Granularity::Year => write!(f, "{}", start.format("%Y")),
        }
    }
}

/// Key of one group in a result table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Int(i64),
    Text(String),
    Bucket(TimeBucket),
}

impl GroupKey {
    /// Key for a raw cell value; nulls do not form a group.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Int64(v) => Some(GroupKey::Int(*v)),
            other => other.to_label().map(GroupKey::Text),
        }
    }
}

impl From<&str> for GroupKey {
    fn from(s: &str) -> Self {
        GroupKey::Text(s.to_string())
    }
}

impl From<TimeBucket> for GroupKey {
    fn from(bucket: TimeBucket) -> Self {
        GroupKey::Bucket(bucket)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Int(v) => write!(f, "{v}"),
            GroupKey::Text(s) => f.write_str(s),
            GroupKey::Bucket(b) => write!(f, "{b}"),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GroupKey::Int(v) => serializer.serialize_i64(*v),
            GroupKey::Text(s) => serializer.serialize_str(s),
            GroupKey::Bucket(b) => serializer.collect_str(b),
        }
    }
}

/// Export label of [`CountKey::Others`].
pub const OTHERS_LABEL: &str = "others";

/// Key of a [`FrequencyTable`]: a literal value, the null cell, or the synthetic
/// catch-all bucket.
///
/// Sorted values first, then `Missing`, then `Others`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CountKey {
    Value(GroupKey),
    /// Records whose cell is null; exported as a JSON `null` key.
    Missing,
    Others,
}

impl From<GroupKey> for CountKey {
    fn from(key: GroupKey) -> Self {
        CountKey::Value(key)
    }
}

impl Serialize for CountKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CountKey::Value(key) => key.serialize(serializer),
            CountKey::Missing => serializer.serialize_none(),
            CountKey::Others => serializer.serialize_str(OTHERS_LABEL),
        }
    }
}

/// Group key → status type → occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable {
    key_name: String,
    columns: Vec<StatusType>,
    rows: BTreeMap<GroupKey, BTreeMap<StatusType, u64>>,
}

impl CountTable {
    /// Empty table whose group keys are exported under `key_name`.
    pub fn new(key_name: impl Into<String>, columns: &[StatusType]) -> Self {
        Self {
            key_name: key_name.into(),
            columns: columns.to_vec(),
            rows: BTreeMap::new(),
        }
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Categories this table reports on.
    pub fn columns(&self) -> &[StatusType] {
        &self.columns
    }

    pub fn rows(&self) -> &BTreeMap<GroupKey, BTreeMap<StatusType, u64>> {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count for one cell; `None` when the pair never occurred.
    pub fn get(&self, key: &GroupKey, status: StatusType) -> Option<u64> {
        self.rows.get(key).and_then(|row| row.get(&status)).copied()
    }

    /// Count one occurrence. Categories outside [`Self::columns`] only create the group.
    pub fn increment(&mut self, key: GroupKey, status: StatusType) {
        let row = self.rows.entry(key).or_default();
        if self.columns.contains(&status) {
            *row.entry(status).or_insert(0) += 1;
        }
    }

    /// Sum of all cells.
    pub fn total(&self) -> u64 {
        self.rows.values().flat_map(|row| row.values()).sum()
    }

    /// Per-category sums over all groups; every column is present, zero included.
    pub fn totals(&self) -> Totals {
        let mut totals: BTreeMap<StatusType, u64> =
            self.columns.iter().map(|&status| (status, 0)).collect();
        for row in self.rows.values() {
            for (status, n) in row {
                *totals.entry(*status).or_insert(0) += n;
            }
        }
        Totals(totals)
    }

    /// Copy of the table with every missing cell filled with zero.
    pub fn densified(&self) -> Self {
        let mut out = self.clone();
        for row in out.rows.values_mut() {
            for &status in &self.columns {
                row.entry(status).or_insert(0);
            }
        }
        out
    }

    /// Serializable view: `[{"<key_name>": key, "<type>": count, ...}, ...]`.
    pub fn records(&self) -> CountRecords<'_> {
        CountRecords(self)
    }
}

/// JSON-records view of a [`CountTable`].
pub struct CountRecords<'a>(&'a CountTable);

impl Serialize for CountRecords<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let table = self.0;
        let mut seq = serializer.serialize_seq(Some(table.rows.len()))?;
        for (key, cells) in &table.rows {
            seq.serialize_element(&CountRow {
                key_name: &table.key_name,
                key,
                cells,
            })?;
        }
        seq.end()
    }
}

struct CountRow<'a> {
    key_name: &'a str,
    key: &'a GroupKey,
    cells: &'a BTreeMap<StatusType, u64>,
}

impl Serialize for CountRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len() + 1))?;
        map.serialize_entry(self.key_name, self.key)?;
        for (status, n) in self.cells {
            map.serialize_entry(status.as_str(), n)?;
        }
        map.end()
    }
}

/// Per-category totals of a [`CountTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals(pub BTreeMap<StatusType, u64>);

impl Totals {
    pub fn get(&self, status: StatusType) -> u64 {
        self.0.get(&status).copied().unwrap_or(0)
    }
}

/// Serializes as `[{"type": "original", "count": n}, ...]`.
impl Serialize for Totals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry {
            #[serde(rename = "type")]
            status: StatusType,
            count: u64,
        }

        serializer.collect_seq(self.0.iter().map(|(&status, &count)| Entry { status, count }))
    }
}

/// Value → occurrence count over the whole dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    key_name: String,
    counts: BTreeMap<CountKey, u64>,
}

impl FrequencyTable {
    pub fn new(key_name: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            counts: BTreeMap::new(),
        }
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn counts(&self) -> &BTreeMap<CountKey, u64> {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn increment(&mut self, key: impl Into<CountKey>) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: impl Into<CountKey>, n: u64) {
        *self.counts.entry(key.into()).or_insert(0) += n;
    }

    pub fn get(&self, key: &CountKey) -> Option<u64> {
        self.counts.get(key).copied()
    }

    /// Count of a literal text value.
    pub fn get_text(&self, value: &str) -> Option<u64> {
        self.get(&CountKey::Value(GroupKey::from(value)))
    }

    pub fn missing(&self) -> Option<u64> {
        self.get(&CountKey::Missing)
    }

    pub fn others(&self) -> Option<u64> {
        self.get(&CountKey::Others)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Collapse every key seen fewer than `threshold` times into [`CountKey::Others`].
    ///
    /// Keys at or above the threshold are kept verbatim, [`CountKey::Missing`] included.
    /// `Others` only appears when at least one key was collapsed; a literal `"others"`
    /// value is then folded into it so the label is exported once. The total is preserved.
    pub fn refine_counts(&self, threshold: u64) -> Self {
        let mut out = Self::new(self.key_name.clone());
        for (key, &n) in &self.counts {
            if n < threshold {
                out.add(CountKey::Others, n);
            } else {
                out.add(key.clone(), n);
            }
        }
        if out.counts.contains_key(&CountKey::Others) {
            let literal = CountKey::Value(GroupKey::from(OTHERS_LABEL));
            if let Some(n) = out.counts.remove(&literal) {
                out.add(CountKey::Others, n);
            }
        }
        out
    }

    /// Serializable view: `[{"<key_name>": value, "count": n}, ...]`.
    pub fn records(&self) -> FrequencyRecords<'_> {
        FrequencyRecords(self)
    }
}

/// JSON-records view of a [`FrequencyTable`].
pub struct FrequencyRecords<'a>(&'a FrequencyTable);

impl Serialize for FrequencyRecords<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Row<'a>(&'a str, &'a CountKey, u64);

        impl Serialize for Row<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(self.0, self.1)?;
                map.serialize_entry("count", &self.2)?;
                map.end()
            }
        }

        let table = self.0;
        serializer.collect_seq(
            table
                .counts
                .iter()
                .map(|(key, &n)| Row(&table.key_name, key, n)),
        )
    }
}
