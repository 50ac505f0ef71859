//! Shared histogram bin edges, bin counts and the optional density overlay

use crate::dataset::{talking_times, Record};
use crate::error::ValidationError;
use crate::stats::sample_std;
use serde::Serialize;
use std::f64::consts::PI;

/// Largest number of bin edges a histogram may have
pub const MAX_BIN_EDGES: usize = 100_000;

/// Number of evaluation points of a density curve
pub const DENSITY_POINTS: usize = 200;

/// Gaussian kernel density estimate, scaled to histogram counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurve {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub bandwidth: f64,
}

/// Histogram of one cohort over the shared edges
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub counts: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<DensityCurve>,
}

impl Histogram {
    pub fn build(records: &[Record], edges: &[f64], with_density: bool) -> Self {
        let values = talking_times(records);
        Self {
            counts: histogram(&values, edges),
            density: if with_density {
                density_curve(&values, edges)
            } else {
                None
            },
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

fn max_talking_time(records: &[Record]) -> Option<f64> {
    talking_times(records).into_iter().reduce(f64::max)
}

/// Bin edges `0, w, 2w, ...` up to the first edge at or beyond the largest
/// talking time of either cohort
///
/// Always at least two edges; `[0, w]` when both cohorts are empty.
/// `bin_width` must be positive (validated upstream). More than
/// `MAX_BIN_EDGES` edges is rejected before anything is allocated.
pub fn compute_bins(
    primary: &[Record],
    comparison: &[Record],
    bin_width: f64,
) -> Result<Vec<f64>, ValidationError> {
    let max = match (max_talking_time(primary), max_talking_time(comparison)) {
        (Some(a), Some(b)) => a.max(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => return Ok(vec![0.0, bin_width]),
    };

    let edges = ((max + bin_width) / bin_width).ceil();
    if edges > MAX_BIN_EDGES as f64 {
        return Err(ValidationError::TooManyBins {
            bin_width,
            edges,
            limit: MAX_BIN_EDGES,
        });
    }
    let len = (edges as usize).max(2);
    Ok((0..len).map(|i| i as f64 * bin_width).collect())
}

/// Count values per bin
///
/// Bins are half-open `[e_i, e_{i+1})` except the last, which also includes
/// its right edge. Values outside the edges and NaN are ignored.
pub fn histogram(values: &[f64], edges: &[f64]) -> Vec<u64> {
    if edges.len() < 2 {
        return Vec::new();
    }
    let mut counts = vec![0u64; edges.len() - 1];
    let first = edges[0];
    let last = edges[edges.len() - 1];

    for &v in values {
        if v.is_nan() || v < first || v > last {
            continue;
        }
        let idx = if v == last {
            counts.len() - 1
        } else {
            edges.partition_point(|e| *e <= v) - 1
        };
        counts[idx] += 1;
    }
    counts
}

/// Evenly spaced points over `[start, stop]`, endpoints included
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut points: Vec<f64> = (0..num).map(|i| i as f64 * step + start).collect();
            points[num - 1] = stop;
            points
        }
    }
}

/// Gaussian KDE with Scott's bandwidth, scaled by `n * bin_width`
///
/// `None` with fewer than two values or zero variance.
pub fn density_curve(values: &[f64], edges: &[f64]) -> Option<DensityCurve> {
    if values.len() < 2 || edges.len() < 2 {
        return None;
    }
    let std = sample_std(values)?;
    if std == 0.0 || !std.is_finite() {
        return None;
    }

    let n = values.len() as f64;
    let bandwidth = std * n.powf(-0.2);
    let norm = 1.0 / (n * (2.0 * PI).sqrt() * bandwidth);
    let scale = n * (edges[1] - edges[0]);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let xs = linspace(min, max, DENSITY_POINTS);
    let ys = xs
        .iter()
        .map(|x| {
            let kernel_sum: f64 = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            kernel_sum * norm * scale
        })
        .collect();

    Some(DensityCurve { xs, ys, bandwidth })
}
