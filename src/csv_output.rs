//! CSV output format for the outlier table
//!
//! One row per outlier in the table's current sort order. Values are
//! written in full, not truncated for display.

use crate::outliers::{OutlierRecord, OutlierTable};

const HEADERS: [&str; 7] = [
    "cohort",
    "talking_time",
    "agent",
    "classification",
    "shift",
    "direction",
    "start",
];

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput<'a> {
    table: &'a OutlierTable,
}

impl<'a> CsvOutput<'a> {
    pub fn new(table: &'a OutlierTable) -> Self {
        Self { table }
    }

    fn header() -> String {
        HEADERS.join(",")
    }

    /// Escape CSV field (handle commas, quotes, line breaks)
    fn escape_field(field: &str) -> String {
        if field.contains([',', '"', '\n', '\r']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_outlier(outlier: &OutlierRecord) -> String {
        let record = &outlier.record;
        let fields = [
            outlier.cohort.as_str().to_string(),
            record.talking_time.to_string(),
            Self::escape_field(record.agent_name.as_deref().unwrap_or("")),
            Self::escape_field(&record.classification),
            Self::escape_field(&record.shift),
            Self::escape_field(record.direction.as_deref().unwrap_or("")),
            Self::escape_field(record.start.as_deref().unwrap_or("")),
        ];
        fields.join(",")
    }

    /// Generate the CSV document
    pub fn to_csv(&self) -> String {
        let mut output = Self::header();
        output.push('\n');
        for outlier in self.table.rows() {
            output.push_str(&Self::format_outlier(outlier));
            output.push('\n');
        }
        output
    }
}
