//! Descriptive statistics over talking times
//!
//! Quantiles use linear interpolation between order statistics (type 7),
//! computed the same way numpy's `percentile` does so that thresholds match
//! spreadsheet/pandas exports to the last bit. Sums use pairwise summation
//! for the same reason.

use crate::dataset::{talking_times, Record};
use serde::Serialize;

/// Block size below which pairwise summation falls back to an unrolled loop
const PAIRWISE_BLOCK: usize = 128;

/// Count, location and spread of one cohort's talking times
///
/// `count` is the number of non-missing values. Every other field is `None`
/// for an empty cohort; `std` is also `None` when `count < 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (N-1 denominator)
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// Signed differences, comparison cohort minus primary cohort
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsDiff {
    pub mean_diff: f64,
    pub median_diff: f64,
    pub std_diff: Option<f64>,
}

/// Values needed to draw one box of a boxplot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub flier_count: usize,
}

/// Sort a copy of `values` ascending, non-finite values dropped
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Percentile (0-100) of ascending-sorted data, linear interpolation
///
/// Returns `None` for empty input.
pub fn percentile(sorted_data: &[f64], percentile: f64) -> Option<f64> {
    let n = sorted_data.len();
    if n == 0 {
        return None;
    }

    let q = percentile / 100.0;
    let virtual_index = (n as f64 * q + (1.0 - q)) - 1.0;
    let previous = virtual_index.floor();
    let gamma = virtual_index - previous;

    let last = (n - 1) as f64;
    let lo = previous.clamp(0.0, last) as usize;
    let hi = (previous + 1.0).clamp(0.0, last) as usize;

    Some(lerp(sorted_data[lo], sorted_data[hi], gamma))
}

/// Quantile (0-1) of a cohort's talking times
pub fn quantile(records: &[Record], q: f64) -> Option<f64> {
    percentile(&sorted_finite(&talking_times(records)), q * 100.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}

/// Pairwise summation with eight partial accumulators per block
pub fn pairwise_sum(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 8 {
        values.iter().fold(-0.0, |acc, v| acc + v)
    } else if n <= PAIRWISE_BLOCK {
        let mut r = [0.0f64; 8];
        r.copy_from_slice(&values[..8]);
        let mut i = 8;
        while i + 8 <= n {
            for (j, acc) in r.iter_mut().enumerate() {
                *acc += values[i + j];
            }
            i += 8;
        }
        let mut res = ((r[0] + r[1]) + (r[2] + r[3])) + ((r[4] + r[5]) + (r[6] + r[7]));
        for v in &values[i..] {
            res += v;
        }
        res
    } else {
        let mut half = n / 2;
        half -= half % 8;
        pairwise_sum(&values[..half]) + pairwise_sum(&values[half..])
    }
}

/// Arithmetic mean, `None` when empty
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(pairwise_sum(values) / values.len() as f64)
}

/// Sample standard deviation, `None` when fewer than two values
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let squares: Vec<f64> = values.iter().map(|v| (v - m) * (v - m)).collect();
    Some((pairwise_sum(&squares) / (values.len() - 1) as f64).sqrt())
}

/// Describe a cohort's talking times
pub fn describe(records: &[Record]) -> DescriptiveStats {
    let values = talking_times(records);
    let sorted = sorted_finite(&values);

    DescriptiveStats {
        count: values.len(),
        mean: mean(&values),
        std: sample_std(&values),
        min: sorted.first().copied(),
        q1: percentile(&sorted, 25.0),
        median: percentile(&sorted, 50.0),
        q3: percentile(&sorted, 75.0),
        max: sorted.last().copied(),
    }
}

/// Comparison minus primary for mean, median and std
///
/// Only computed when both cohorts have data.
pub fn compare(primary: &DescriptiveStats, comparison: &DescriptiveStats) -> Option<StatsDiff> {
    if primary.count == 0 || comparison.count == 0 {
        return None;
    }

    Some(StatsDiff {
        mean_diff: comparison.mean? - primary.mean?,
        median_diff: comparison.median? - primary.median?,
        std_diff: match (primary.std, comparison.std) {
            (Some(a), Some(b)) => Some(b - a),
            _ => None,
        },
    })
}

/// Boxplot geometry with whiskers at 1.5 IQR
pub fn box_summary(records: &[Record]) -> Option<BoxSummary> {
    let sorted = sorted_finite(&talking_times(records));
    let q1 = percentile(&sorted, 25.0)?;
    let median = percentile(&sorted, 50.0)?;
    let q3 = percentile(&sorted, 75.0)?;
    let iqr = q3 - q1;

    let high_limit = q3 + 1.5 * iqr;
    let whisker_high = sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= high_limit)
        .filter(|v| *v >= q3)
        .unwrap_or(q3);

    let low_limit = q1 - 1.5 * iqr;
    let whisker_low = sorted
        .iter()
        .copied()
        .find(|v| *v >= low_limit)
        .filter(|v| *v <= q1)
        .unwrap_or(q1);

    let flier_count = sorted
        .iter()
        .filter(|v| **v < whisker_low || **v > whisker_high)
        .count();

    Some(BoxSummary {
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        flier_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cohort(times: &[f64]) -> Vec<Record> {
        times
            .iter()
            .map(|t| Record::new("A", "X", "TT", *t))
            .collect()
    }

    #[test]
    fn test_percentile_odd_length() {
        let data = [1.0, 3.0, 5.0, 7.0, 9.0];
        assert_eq!(percentile(&data, 50.0), Some(5.0));
    }

    #[test]
    fn test_percentile_even_length() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&data, 50.0), Some(2.5));
        assert_eq!(percentile(&data, 25.0), Some(1.75));
        assert_eq!(percentile(&data, 75.0), Some(3.25));
    }

    #[test]
    fn test_percentile_bounds() {
        let data = [2.0, 4.0, 8.0];
        assert_eq!(percentile(&data, 0.0), Some(2.0));
        assert_eq!(percentile(&data, 100.0), Some(8.0));
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_percentile_single_value() {
        assert_eq!(percentile(&[42.0], 98.0), Some(42.0));
    }

    #[test]
    fn test_quantile_skips_nan() {
        let records = cohort(&[10.0, f64::NAN, 20.0]);
        assert_eq!(quantile(&records, 0.5), Some(15.0));
    }

    #[test]
    fn test_pairwise_sum_matches_naive_for_small_input() {
        let values: Vec<f64> = (1..=200).map(f64::from).collect();
        assert_eq!(pairwise_sum(&values), 20100.0);
        assert_eq!(pairwise_sum(&[1.5, 2.5]), 4.0);
        assert_eq!(pairwise_sum(&[]), 0.0);
    }

    #[test]
    fn test_describe_basic() {
        let stats = describe(&cohort(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]));
        assert_eq!(stats.count, 8);
        assert_eq!(stats.mean, Some(5.0));
        assert_eq!(stats.median, Some(4.5));
        let std = stats.std.unwrap();
        assert!((std - 2.138089935299395).abs() < 1e-12);
        assert_eq!(stats.min, Some(2.0));
        assert_eq!(stats.max, Some(9.0));
    }

    #[test]
    fn test_describe_single_value() {
        let stats = describe(&cohort(&[42.0]));
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, Some(42.0));
        assert_eq!(stats.median, Some(42.0));
        assert_eq!(stats.std, None);
    }

    #[test]
    fn test_describe_empty() {
        let stats = describe(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.median, None);
        assert_eq!(stats.std, None);
    }

    #[test]
    fn test_compare_is_comparison_minus_primary() {
        let primary = describe(&cohort(&[10.0, 12.0, 14.0]));
        let comparison = describe(&cohort(&[20.0, 22.0, 24.0]));
        let diff = compare(&primary, &comparison).unwrap();
        assert_eq!(diff.mean_diff, 10.0);
        assert_eq!(diff.median_diff, 10.0);
        assert_eq!(diff.std_diff, Some(0.0));
    }

    #[test]
    fn test_compare_requires_both_cohorts() {
        let primary = describe(&cohort(&[10.0]));
        let empty = describe(&[]);
        assert!(compare(&primary, &empty).is_none());
        assert!(compare(&empty, &primary).is_none());
    }

    #[test]
    fn test_compare_std_unavailable_for_single_value() {
        let primary = describe(&cohort(&[10.0]));
        let comparison = describe(&cohort(&[10.0, 20.0]));
        let diff = compare(&primary, &comparison).unwrap();
        assert_eq!(diff.std_diff, None);
        assert_eq!(diff.mean_diff, 5.0);
    }

    #[test]
    fn test_box_summary_whiskers() {
        let summary = box_summary(&cohort(&[10.0, 11.0, 12.0, 13.0, 200.0])).unwrap();
        assert_eq!(summary.q1, 11.0);
        assert_eq!(summary.median, 12.0);
        assert_eq!(summary.q3, 13.0);
        assert_eq!(summary.whisker_low, 10.0);
        assert_eq!(summary.whisker_high, 13.0);
        assert_eq!(summary.flier_count, 1);
    }

    #[test]
    fn test_box_summary_empty() {
        assert!(box_summary(&[]).is_none());
    }
}
