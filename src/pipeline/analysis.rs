use super::params::{AnalysisParams, ValidatedParams};
use super::report::{AdvancedPanels, CohortReport, Report, REPORT_VERSION};
use crate::agents::{agent_performance, aggregate_by_agent, AgentTable};
use crate::correlation::correlation_matrix;
use crate::dataset::{Dataset, Record, Schema};
use crate::distribution::category_distribution;
use crate::error::ValidationError;
use crate::filter::{filter, filter_by_group_and_shift, trim_upper_tail};
use crate::histogram::{compute_bins, Histogram};
use crate::outliers::{detect_with_bounds, tag_and_merge, OutlierTable};
use crate::selection::ValidCohort;
use crate::stats::{box_summary, compare, describe};
use crate::temporal::{activity_heatmap, daily_series};

/// Run the full pipeline for one set of parameters
///
/// Returns a validation error, without computing anything, when any input
/// is rejected. The bin count depends on the selected data, so a bin width
/// too small for the cohorts' range is rejected after filtering. An empty
/// selection result is not an error: the report is flagged `no_data`
/// instead.
pub fn run_analysis(dataset: &Dataset, params: &AnalysisParams) -> Result<Report, ValidationError> {
    let result = params
        .validate()
        .and_then(|valid| analyze(dataset, &valid));
    if let Err(e) = &result {
        tracing::warn!("Rejected analysis parameters: {}", e);
    }
    result
}

fn select(dataset: &Dataset, cohort: &ValidCohort, classification: &str) -> Vec<Record> {
    filter(dataset, &cohort.groups, classification, &cohort.shift)
}

fn analyze(dataset: &Dataset, params: &ValidatedParams) -> Result<Report, ValidationError> {
    let classification = params.classification.as_str();
    let primary = select(dataset, &params.primary, classification);
    let comparison = params
        .comparison
        .as_ref()
        .map(|c| select(dataset, c, classification));

    let comparison_len = comparison.as_ref().map_or(0, Vec::len);
    if primary.is_empty() && comparison_len == 0 {
        tracing::info!("No records match the current filters");
        return Ok(Report::no_data(
            classification,
            &params.primary,
            params.comparison.as_ref(),
            params.bin_width,
        ));
    }

    let schema = dataset.schema();
    let advanced = advanced_panels(&primary, comparison.as_deref(), schema);
    let primary_matched = primary.len();

    let primary_trimmed = trim_upper_tail(primary, params.primary.trim_fraction);
    let comparison_trimmed = params
        .comparison
        .as_ref()
        .zip(comparison)
        .map(|(c, records)| trim_upper_tail(records, c.trim_fraction));

    let bin_edges = compute_bins(
        &primary_trimmed,
        comparison_trimmed.as_deref().unwrap_or(&[]),
        params.bin_width,
    )?;

    let (primary_report, primary_outliers) = cohort_report(
        &params.primary,
        primary_matched,
        primary_trimmed,
        &bin_edges,
        params.show_density_curve,
    );
    let (comparison_report, comparison_outliers) = match (&params.comparison, comparison_trimmed) {
        (Some(selection), Some(records)) => {
            let (report, outliers) = cohort_report(
                selection,
                comparison_len,
                records,
                &bin_edges,
                params.show_density_curve,
            );
            (Some(report), outliers)
        }
        _ => (None, Vec::new()),
    };

    let diff = comparison_report
        .as_ref()
        .and_then(|c| compare(&primary_report.stats, &c.stats));

    let categories = category_distribution(
        &filter_by_group_and_shift(dataset, &params.primary.groups, &params.primary.shift),
        params
            .comparison
            .as_ref()
            .map(|c| filter_by_group_and_shift(dataset, &c.groups, &c.shift))
            .as_deref(),
    );

    let outliers = OutlierTable::new(tag_and_merge(primary_outliers, comparison_outliers));
    let agents = AgentTable::new(aggregate_by_agent(outliers.rows(), schema));
    tracing::info!(
        "Analysis complete: {} primary records, {} outliers",
        primary_report.stats.count,
        outliers.len()
    );

    Ok(Report {
        version: REPORT_VERSION,
        classification: classification.to_string(),
        no_data: false,
        primary: primary_report,
        comparison: comparison_report,
        bin_edges,
        diff,
        categories,
        outliers,
        agents,
        advanced,
    })
}

fn cohort_report(
    selection: &ValidCohort,
    matched: usize,
    records: Vec<Record>,
    bin_edges: &[f64],
    with_density: bool,
) -> (CohortReport, Vec<Record>) {
    let detection = detect_with_bounds(&records);
    let report = CohortReport {
        groups: selection.groups.clone(),
        shift: selection.shift.clone(),
        trim_fraction: selection.trim_fraction,
        matched,
        stats: describe(&records),
        box_summary: box_summary(&records),
        histogram: Histogram::build(&records, bin_edges, with_density),
        outlier_bounds: detection.bounds,
        outlier_count: detection.outliers.len(),
        records,
    };
    (report, detection.outliers)
}

fn advanced_panels(primary: &[Record], comparison: Option<&[Record]>, schema: Schema) -> AdvancedPanels {
    let mut combined = primary.to_vec();
    if let Some(records) = comparison {
        combined.extend_from_slice(records);
    }
    let has_primary = !primary.is_empty();

    AdvancedPanels {
        activity_heatmap: (schema.has_timestamp && !combined.is_empty())
            .then(|| activity_heatmap(&combined)),
        daily_series: (schema.has_timestamp && has_primary).then(|| daily_series(primary)),
        agent_performance: if has_primary {
            agent_performance(primary, schema)
        } else {
            None
        },
        correlation: correlation_matrix(primary, schema),
    }
}
