//! Time-of-week activity and daily talking time series
//!
//! Both views bucket records by their start timestamp. Records whose
//! timestamp is absent or unparsable are skipped, never fatal.

use crate::dataset::Record;
use crate::stats::{mean, percentile, sorted_finite};
use chrono::{Datelike, NaiveDate, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
pub const HOURS: usize = 24;

/// Call counts per weekday (Monday first) and hour of day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityHeatmap {
    pub counts: [[u64; HOURS]; 7],
    /// Records left out because their timestamp did not parse
    pub skipped: usize,
}

impl ActivityHeatmap {
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Busiest weekday/hour cell as `(day index, hour, count)`
    pub fn peak(&self) -> Option<(usize, usize, u64)> {
        let mut best: Option<(usize, usize, u64)> = None;
        for (day, row) in self.counts.iter().enumerate() {
            for (hour, &count) in row.iter().enumerate() {
                if count > 0 && best.map_or(true, |(_, _, c)| count > c) {
                    best = Some((day, hour, count));
                }
            }
        }
        best
    }
}

pub fn activity_heatmap(records: &[Record]) -> ActivityHeatmap {
    let mut heatmap = ActivityHeatmap {
        counts: [[0; HOURS]; 7],
        skipped: 0,
    };
    for record in records {
        match record.start_timestamp() {
            Ok(ts) => {
                let day = ts.weekday().num_days_from_monday() as usize;
                heatmap.counts[day][ts.hour() as usize] += 1;
            }
            Err(_) => heatmap.skipped += 1,
        }
    }
    if heatmap.skipped > 0 {
        tracing::debug!("Heatmap skipped {} records without a usable start time", heatmap.skipped);
    }
    heatmap
}

/// Talking time summary of one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub count: usize,
}

/// Per-day mean, median and count, oldest day first
pub fn daily_series(records: &[Record]) -> Vec<DailyPoint> {
    let mut by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for record in records {
        let Ok(ts) = record.start_timestamp() else {
            continue;
        };
        let times = by_day.entry(ts.date()).or_default();
        if record.talking_time.is_finite() {
            times.push(record.talking_time);
        }
    }

    by_day
        .into_iter()
        .map(|(date, times)| DailyPoint {
            date,
            mean: mean(&times),
            median: percentile(&sorted_finite(&times), 50.0),
            count: times.len(),
        })
        .collect()
}
