//! JSON output format for analysis reports
//!
//! `--format json` wraps the report in a versioned envelope together with
//! where the data came from.

use crate::dataset::Schema;
use crate::loader::DataSource;
use crate::pipeline::Report;
use serde::Serialize;

/// Envelope written by `--format json`
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    pub version: String,
    pub format: String,
    pub source: &'a DataSource,
    /// Records in the loaded dataset
    pub records: usize,
    pub schema: Schema,
    pub report: &'a Report,
}

impl<'a> JsonOutput<'a> {
    pub fn new(source: &'a DataSource, records: usize, schema: Schema, report: &'a Report) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "talktime-json-v1".to_string(),
            source,
            records,
            schema,
            report,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
