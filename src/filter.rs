//! Cohort filtering: group/classification/shift selection and upper-tail trim
//!
//! Filters never touch the dataset; they return owned copies of the
//! matching records in their original order.

use crate::dataset::{Dataset, Record};
use crate::stats::quantile;
use std::collections::HashSet;

/// Predicate selecting one cohort's records
#[derive(Debug, Clone)]
pub struct CohortFilter {
    groups: HashSet<String>,
    /// `None` keeps every classification
    classification: Option<String>,
    shift: String,
}

impl CohortFilter {
    /// Filter on groups, classification and shift
    pub fn new<S: AsRef<str>>(groups: &[S], classification: &str, shift: &str) -> Self {
        Self {
            groups: groups.iter().map(|g| g.as_ref().to_string()).collect(),
            classification: Some(classification.to_string()),
            shift: shift.to_string(),
        }
    }

    /// Filter on groups and shift only, keeping every classification
    pub fn any_classification<S: AsRef<str>>(groups: &[S], shift: &str) -> Self {
        Self {
            groups: groups.iter().map(|g| g.as_ref().to_string()).collect(),
            classification: None,
            shift: shift.to_string(),
        }
    }

    /// Check whether a record belongs to the cohort
    pub fn matches(&self, record: &Record) -> bool {
        self.groups.contains(&record.group)
            && record.shift == self.shift
            && self
                .classification
                .as_ref()
                .map_or(true, |c| record.classification == *c)
    }

    /// Matching records, original order preserved
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Records whose group is in `groups` and whose classification and shift match
pub fn filter<S: AsRef<str>>(
    dataset: &Dataset,
    groups: &[S],
    classification: &str,
    shift: &str,
) -> Vec<Record> {
    let cohort = CohortFilter::new(groups, classification, shift).apply(dataset.records());
    tracing::debug!(
        "Filtered {} of {} records (classification={}, shift={})",
        cohort.len(),
        dataset.len(),
        classification,
        shift
    );
    cohort
}

/// Records whose group is in `groups` and whose shift matches, any classification
pub fn filter_by_group_and_shift<S: AsRef<str>>(
    dataset: &Dataset,
    groups: &[S],
    shift: &str,
) -> Vec<Record> {
    CohortFilter::any_classification(groups, shift).apply(dataset.records())
}

/// Drop the top `trim_fraction` of talking times by quantile threshold
///
/// Keeps records with `talking_time <=` the `(1 - trim_fraction)` quantile
/// of this cohort. A zero fraction or an empty cohort is returned unchanged.
pub fn trim_upper_tail(records: Vec<Record>, trim_fraction: f64) -> Vec<Record> {
    if trim_fraction == 0.0 || records.is_empty() {
        return records;
    }

    let Some(threshold) = quantile(&records, 1.0 - trim_fraction) else {
        return records;
    };

    let before = records.len();
    let trimmed: Vec<Record> = records
        .into_iter()
        .filter(|r| r.talking_time <= threshold)
        .collect();
    tracing::debug!(
        "Trimmed upper {:.2}% at {:.3}s: kept {} of {}",
        trim_fraction * 100.0,
        threshold,
        trimmed.len(),
        before
    );
    trimmed
}
