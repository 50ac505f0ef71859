//! Pearson correlation between talking time and encoded call attributes

use crate::dataset::{Record, Schema};
use chrono::Timelike;
use serde::Serialize;

pub const TALKING_TIME: &str = "TalkingTime";
pub const HOUR: &str = "Hour";
pub const SHIFT_TM: &str = "Shift_TM";
pub const SHIFT_TT: &str = "Shift_TT";
pub const DIRECTION_MANUAL: &str = "Direction_Manual";

/// Square correlation matrix; `None` cells are undefined
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<&'static str>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == row)?;
        let j = self.columns.iter().position(|c| *c == column)?;
        self.values[i][j]
    }
}

fn indicator(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

fn encode(records: &[Record], schema: Schema) -> Vec<(&'static str, Vec<f64>)> {
    let mut columns: Vec<(&'static str, Vec<f64>)> =
        vec![(TALKING_TIME, records.iter().map(|r| r.talking_time).collect())];
    if schema.has_timestamp {
        let hours: Vec<f64> = records
            .iter()
            .map(|r| r.start_timestamp().map_or(f64::NAN, |ts| f64::from(ts.hour())))
            .collect();
        columns.push((HOUR, hours));
    }
    columns.push((SHIFT_TM, records.iter().map(|r| indicator(r.shift == "TM")).collect()));
    columns.push((SHIFT_TT, records.iter().map(|r| indicator(r.shift == "TT")).collect()));
    columns.push((
        DIRECTION_MANUAL,
        records
            .iter()
            .map(|r| indicator(r.direction.as_deref() == Some("Manual")))
            .collect(),
    ));
    columns
}

/// Pearson coefficient over the positions where both values are present
///
/// `None` with fewer than two complete pairs or when either side is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(x, y)| (*x, *y))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Correlation matrix of a cohort, `None` when it is empty
pub fn correlation_matrix(records: &[Record], schema: Schema) -> Option<CorrelationMatrix> {
    if records.is_empty() {
        return None;
    }
    let encoded = encode(records, schema);
    let values: Vec<Vec<Option<f64>>> = encoded
        .iter()
        .map(|(_, xs)| encoded.iter().map(|(_, ys)| pearson(xs, ys)).collect())
        .collect();
    Some(CorrelationMatrix {
        columns: encoded.iter().map(|(name, _)| *name).collect(),
        values,
    })
}
