//! In-memory call dataset
//!
//! A `Dataset` is built once (from a file or synthesized) and never mutated
//! afterwards; every filter produces a new owned `Vec<Record>`.

use crate::error::TimestampParseError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeSet;

/// Header names as they appear in the source file
pub const COL_GROUP: &str = "grupo";
pub const COL_CLASSIFICATION: &str = "Tipificación";
pub const COL_SHIFT: &str = "Turno";
pub const COL_TALKING_TIME: &str = "TalkingTime";
pub const COL_AGENT: &str = "Nombre Agente";
pub const COL_DIRECTION: &str = "Sentido";
pub const COL_START: &str = "Inicio";

const TIMESTAMP_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// One call event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub group: String,
    pub classification: String,
    pub shift: String,
    /// Seconds; NaN when the source cell was empty or unparsable
    pub talking_time: f64,
    pub agent_name: Option<String>,
    pub direction: Option<String>,
    /// Raw `Inicio` text
    pub start: Option<String>,
}

impl Record {
    pub fn new(group: &str, classification: &str, shift: &str, talking_time: f64) -> Self {
        Self {
            group: group.to_string(),
            classification: classification.to_string(),
            shift: shift.to_string(),
            talking_time,
            agent_name: None,
            direction: None,
            start: None,
        }
    }

    pub fn with_agent(mut self, agent: &str) -> Self {
        self.agent_name = Some(agent.to_string());
        self
    }

    pub fn with_direction(mut self, direction: &str) -> Self {
        self.direction = Some(direction.to_string());
        self
    }

    pub fn with_start(mut self, start: &str) -> Self {
        self.start = Some(start.to_string());
        self
    }

    /// Parse the start timestamp
    ///
    /// Absent timestamps are reported as a parse failure of the empty string,
    /// so consumers only deal with one failure path.
    pub fn start_timestamp(&self) -> Result<NaiveDateTime, TimestampParseError> {
        match &self.start {
            Some(raw) => parse_timestamp(raw),
            None => Err(TimestampParseError(String::new())),
        }
    }
}

/// Parse a timestamp in any of the formats seen in exported call logs
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampParseError> {
    let text = raw.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.naive_local());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TimestampParseError(raw.to_string()))
}

/// Which optional columns the dataset carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_agent_name: bool,
    pub has_direction: bool,
    pub has_timestamp: bool,
}

/// Categorical columns that can be enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Group,
    Classification,
    Shift,
    AgentName,
    Direction,
}

/// Ordered, immutable collection of call records
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    schema: Schema,
}

impl Dataset {
    pub fn new(records: Vec<Record>, schema: Schema) -> Self {
        Self { records, schema }
    }

    /// Build a dataset, deriving the schema from which optional fields are set
    pub fn from_records(records: Vec<Record>) -> Self {
        let schema = Schema {
            has_agent_name: records.iter().any(|r| r.agent_name.is_some()),
            has_direction: records.iter().any(|r| r.direction.is_some()),
            has_timestamp: records.iter().any(|r| r.start.is_some()),
        };
        Self { records, schema }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct values of a categorical column (missing values skipped)
    pub fn distinct(&self, column: Column) -> Vec<String> {
        let values: BTreeSet<&str> = self
            .records
            .iter()
            .filter_map(|r| match column {
                Column::Group => Some(r.group.as_str()),
                Column::Classification => Some(r.classification.as_str()),
                Column::Shift => Some(r.shift.as_str()),
                Column::AgentName => r.agent_name.as_deref(),
                Column::Direction => r.direction.as_deref(),
            })
            .collect();
        values.into_iter().map(str::to_string).collect()
    }
}

/// Finite talking times of a record slice, in record order
pub fn talking_times(records: &[Record]) -> Vec<f64> {
    records
        .iter()
        .map(|r| r.talking_time)
        .filter(|t| t.is_finite())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Weekday};

    #[test]
    fn test_parse_iso_timestamp() {
        let ts = parse_timestamp("2024-03-04 09:15:00").unwrap();
        assert_eq!(ts.hour(), 9);
        assert_eq!(ts.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_parse_day_first_timestamp() {
        let ts = parse_timestamp("04/03/2024 17:40").unwrap();
        assert_eq!(ts.month(), 3);
        assert_eq!(ts.day(), 4);
        assert_eq!(ts.hour(), 17);
    }

    #[test]
    fn test_parse_date_only() {
        let ts = parse_timestamp("2024-03-04").unwrap();
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn test_parse_rfc3339() {
        assert!(parse_timestamp("2024-03-04T09:15:00+01:00").is_ok());
    }

    #[test]
    fn test_parse_garbage_fails() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert_eq!(err.0, "yesterday");
    }

    #[test]
    fn test_absent_start_is_parse_failure() {
        let r = Record::new("A", "X", "TT", 1.0);
        assert!(r.start_timestamp().is_err());
    }

    #[test]
    fn test_schema_from_records() {
        let ds = Dataset::from_records(vec![
            Record::new("A", "X", "TT", 1.0).with_agent("ana"),
            Record::new("B", "X", "TM", 2.0),
        ]);
        let schema = ds.schema();
        assert!(schema.has_agent_name);
        assert!(!schema.has_direction);
        assert!(!schema.has_timestamp);
    }

    #[test]
    fn test_distinct_sorted() {
        let ds = Dataset::from_records(vec![
            Record::new("b", "X", "TT", 1.0),
            Record::new("a", "Y", "TT", 2.0),
            Record::new("b", "X", "TM", 3.0),
        ]);
        assert_eq!(ds.distinct(Column::Group), vec!["a", "b"]);
        assert_eq!(ds.distinct(Column::Shift), vec!["TM", "TT"]);
        assert!(ds.distinct(Column::AgentName).is_empty());
    }

    #[test]
    fn test_talking_times_skip_nan() {
        let records = vec![
            Record::new("A", "X", "TT", 1.0),
            Record::new("A", "X", "TT", f64::NAN),
            Record::new("A", "X", "TT", 3.0),
        ];
        assert_eq!(talking_times(&records), vec![1.0, 3.0]);
    }
}
