//! IQR outlier detection and the sortable outlier table
//!
//! Outliers are records strictly outside Tukey's fences
//! `[Q1 - 1.5·IQR, Q3 + 1.5·IQR]`, using the same quantile convention as
//! trimming. Records with a missing talking time are never outliers.

use crate::dataset::{parse_timestamp, talking_times, Record};
use crate::display::truncate;
use crate::sort::{missing_last, stable_sort_by, SortDirection, SortState};
use crate::stats::{percentile, sorted_finite};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Fence multiplier applied to the interquartile range
pub const IQR_FACTOR: f64 = 1.5;

/// Placeholder row text for an empty outlier set
pub const NO_OUTLIERS: &str = "No outliers";

/// Quartiles and fences of one cohort
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    /// Fences for a cohort, `None` when it has no talking times
    pub fn of(records: &[Record]) -> Option<Self> {
        let sorted = sorted_finite(&talking_times(records));
        let q1 = percentile(&sorted, 25.0)?;
        let q3 = percentile(&sorted, 75.0)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            iqr,
            lower: q1 - IQR_FACTOR * iqr,
            upper: q3 + IQR_FACTOR * iqr,
        })
    }

    pub fn is_outlier(&self, talking_time: f64) -> bool {
        talking_time < self.lower || talking_time > self.upper
    }
}

/// Outliers of one cohort together with the fences that selected them
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub bounds: Option<OutlierBounds>,
    pub outliers: Vec<Record>,
}

/// Detect outliers and keep the fences
pub fn detect_with_bounds(records: &[Record]) -> Detection {
    let Some(bounds) = OutlierBounds::of(records) else {
        return Detection {
            bounds: None,
            outliers: Vec::new(),
        };
    };

    let mut outliers: Vec<Record> = records
        .iter()
        .filter(|r| r.talking_time.is_finite() && bounds.is_outlier(r.talking_time))
        .cloned()
        .collect();
    outliers.sort_by(|a, b| b.talking_time.total_cmp(&a.talking_time));

    tracing::debug!(
        "Detected {} outliers outside [{:.3}, {:.3}]",
        outliers.len(),
        bounds.lower,
        bounds.upper
    );
    Detection {
        bounds: Some(bounds),
        outliers,
    }
}

/// Outliers of a cohort ordered by talking time, longest first
pub fn detect(records: &[Record]) -> Vec<Record> {
    detect_with_bounds(records).outliers
}

/// Which cohort an outlier came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CohortTag {
    Primary,
    Comparison,
}

impl CohortTag {
    pub fn marker(self) -> &'static str {
        match self {
            CohortTag::Primary => "[P]",
            CohortTag::Comparison => "[C]",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CohortTag::Primary => "primary",
            CohortTag::Comparison => "comparison",
        }
    }
}

/// A detected outlier annotated with its source cohort
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierRecord {
    pub cohort: CohortTag,
    #[serde(flatten)]
    pub record: Record,
}

/// Primary block followed by comparison block, each in detector order
pub fn tag_and_merge(primary: Vec<Record>, comparison: Vec<Record>) -> Vec<OutlierRecord> {
    let primary = primary.into_iter().map(|record| OutlierRecord {
        cohort: CohortTag::Primary,
        record,
    });
    let comparison = comparison.into_iter().map(|record| OutlierRecord {
        cohort: CohortTag::Comparison,
        record,
    });
    primary.chain(comparison).collect()
}

/// Sortable columns of the outlier table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierColumn {
    TalkingTime,
    Agent,
    Classification,
    Shift,
    Direction,
    Start,
}

impl OutlierColumn {
    pub const ALL: [OutlierColumn; 6] = [
        OutlierColumn::TalkingTime,
        OutlierColumn::Agent,
        OutlierColumn::Classification,
        OutlierColumn::Shift,
        OutlierColumn::Direction,
        OutlierColumn::Start,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OutlierColumn::TalkingTime => "Talking time",
            OutlierColumn::Agent => "Agent",
            OutlierColumn::Classification => "Classification",
            OutlierColumn::Shift => "Shift",
            OutlierColumn::Direction => "Direction",
            OutlierColumn::Start => "Start",
        }
    }
}

/// One rendered row of the outlier table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlierRow {
    pub talking_time: String,
    pub agent: String,
    pub classification: String,
    pub shift: String,
    pub direction: String,
    pub start: String,
}

impl OutlierRow {
    fn placeholder() -> Self {
        Self {
            talking_time: NO_OUTLIERS.to_string(),
            agent: String::new(),
            classification: String::new(),
            shift: String::new(),
            direction: String::new(),
            start: String::new(),
        }
    }

    fn render(outlier: &OutlierRecord) -> Self {
        let record = &outlier.record;
        let agent = record.agent_name.as_deref().unwrap_or("N/A");
        let start = match record.start_timestamp() {
            Ok(ts) => ts.format("%d/%m %H:%M").to_string(),
            Err(_) => truncate(record.start.as_deref().unwrap_or("N/A"), 16),
        };
        Self {
            talking_time: format!("{:.1}", record.talking_time),
            agent: format!("{} {}", outlier.cohort.marker(), truncate(agent, 15)),
            classification: truncate(&record.classification, 20),
            shift: truncate(&record.shift, 10),
            direction: truncate(record.direction.as_deref().unwrap_or("N/A"), 15),
            start,
        }
    }
}

/// Merged outliers plus the table's own sort state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierTable {
    rows: Vec<OutlierRecord>,
    sort: SortState<OutlierColumn>,
}

impl OutlierTable {
    /// Table in merge order with no active sort column
    pub fn new(rows: Vec<OutlierRecord>) -> Self {
        Self {
            rows,
            sort: SortState::unsorted(),
        }
    }

    pub fn rows(&self) -> &[OutlierRecord] {
        &self.rows
    }

    pub fn sort_state(&self) -> SortState<OutlierColumn> {
        self.sort
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count(&self, cohort: CohortTag) -> usize {
        self.rows.iter().filter(|r| r.cohort == cohort).count()
    }

    /// Handle a header click on `column`
    pub fn sort(&mut self, column: OutlierColumn) {
        self.sort = self.sort.request(column);
        sort_outliers(&mut self.rows, column, self.sort.direction);
    }

    pub fn headers(&self) -> Vec<String> {
        OutlierColumn::ALL
            .iter()
            .map(|c| self.sort.header(*c, c.label()))
            .collect()
    }

    /// Display rows; a single placeholder row when there are no outliers
    pub fn display_rows(&self) -> Vec<OutlierRow> {
        if self.rows.is_empty() {
            return vec![OutlierRow::placeholder()];
        }
        self.rows.iter().map(OutlierRow::render).collect()
    }
}

fn text_key(record: &Record, column: OutlierColumn) -> Option<&str> {
    match column {
        OutlierColumn::Agent => record.agent_name.as_deref(),
        OutlierColumn::Classification => Some(record.classification.as_str()),
        OutlierColumn::Shift => Some(record.shift.as_str()),
        OutlierColumn::Direction => record.direction.as_deref(),
        OutlierColumn::Start => record.start.as_deref(),
        OutlierColumn::TalkingTime => None,
    }
}

/// Stable sort of outliers by one column
///
/// Start times sort chronologically when every present value parses, and
/// by raw text otherwise. Missing values go last in both directions.
pub fn sort_outliers(rows: &mut [OutlierRecord], column: OutlierColumn, direction: SortDirection) {
    match column {
        OutlierColumn::TalkingTime => stable_sort_by(rows, direction, |a, b| {
            a.record.talking_time.total_cmp(&b.record.talking_time)
        }),
        OutlierColumn::Start => {
            let parsed: Option<Vec<Option<NaiveDateTime>>> = rows
                .iter()
                .map(|r| match r.record.start.as_deref() {
                    Some(raw) => parse_timestamp(raw).ok().map(Some),
                    None => Some(None),
                })
                .collect();
            match parsed {
                Some(times) => {
                    let mut keyed: Vec<(Option<NaiveDateTime>, OutlierRecord)> =
                        times.into_iter().zip(rows.iter().cloned()).collect();
                    stable_sort_by(&mut keyed, direction, |a, b| {
                        missing_last(a.0, b.0, direction, NaiveDateTime::cmp)
                    });
                    for (slot, (_, row)) in rows.iter_mut().zip(keyed) {
                        *slot = row;
                    }
                }
                None => {
                    tracing::debug!("Unparsable start time, sorting start column as text");
                    sort_by_text(rows, column, direction);
                }
            }
        }
        _ => sort_by_text(rows, column, direction),
    }
}

fn sort_by_text(rows: &mut [OutlierRecord], column: OutlierColumn, direction: SortDirection) {
    stable_sort_by(rows, direction, |a, b| {
        missing_last(
            text_key(&a.record, column),
            text_key(&b.record, column),
            direction,
            |x, y| x.cmp(y),
        )
    });
}
