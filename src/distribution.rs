//! Classification breakdown of the selected groups and shift

use crate::dataset::Record;
use crate::display::ellipsize;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

const LABEL_WIDTH: usize = 15;

/// Share of each classification in a cohort, as a percentage of its records
///
/// Callers pass a cohort filtered by group and shift only, so every
/// classification of those groups shows up. Empty input gives an empty map.
pub fn distribution(records: &[Record]) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.classification.clone()).or_insert(0) += 1;
    }
    let total = records.len() as f64;
    counts
        .into_iter()
        .map(|(label, count)| (label, 100.0 * count as f64 / total))
        .collect()
}

/// One bar group on the category axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub label: String,
    pub short_label: String,
    pub primary: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<f64>,
}

/// Category axis shared by both cohorts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDistribution {
    pub categories: Vec<CategoryShare>,
}

impl CategoryDistribution {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Distribution per cohort over the sorted union of their classifications
///
/// A classification missing from one cohort counts as 0% there.
pub fn category_distribution(primary: &[Record], comparison: Option<&[Record]>) -> CategoryDistribution {
    let primary_shares = distribution(primary);
    let comparison_shares = comparison.map(distribution);

    let mut labels: BTreeSet<&String> = primary_shares.keys().collect();
    if let Some(shares) = &comparison_shares {
        labels.extend(shares.keys());
    }

    let categories = labels
        .into_iter()
        .map(|label| CategoryShare {
            label: label.clone(),
            short_label: ellipsize(label, LABEL_WIDTH),
            primary: primary_shares.get(label).copied().unwrap_or(0.0),
            comparison: comparison_shares
                .as_ref()
                .map(|shares| shares.get(label).copied().unwrap_or(0.0)),
        })
        .collect();
    CategoryDistribution { categories }
}
