//! Human-readable report rendering (`--format text`)

use crate::pipeline::{CohortReport, Report};
use crate::stats::DescriptiveStats;
use crate::temporal::DAY_LABELS;

const RULE: &str = "------------------------------------------------------------------------";

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}", v))
}

fn signed(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:+.2}", v))
}

fn cohort_title(name: &str, cohort: &CohortReport) -> String {
    format!(
        "=== {} cohort: {} | shift {} | trim {:.1}% ===\n",
        name,
        cohort.groups.join(", "),
        cohort.shift,
        cohort.trim_fraction * 100.0
    )
}

fn format_stats(stats: &DescriptiveStats, cohort: &CohortReport) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "  Count:    {} ({} matched before trim)\n",
        stats.count, cohort.matched
    ));
    output.push_str(&format!("  Mean:     {}\n", opt(stats.mean)));
    output.push_str(&format!("  Median:   {}\n", opt(stats.median)));
    output.push_str(&format!("  Std Dev:  {}\n", opt(stats.std)));
    output.push_str(&format!("  Q1 / Q3:  {} / {}\n", opt(stats.q1), opt(stats.q3)));
    output.push_str(&format!("  Min/Max:  {} / {}\n", opt(stats.min), opt(stats.max)));
    output.push_str(&format!("  Outliers: {}\n", cohort.outlier_count));
    if let Some(bounds) = &cohort.outlier_bounds {
        output.push_str(&format!(
            "  Fences:   [{:.2}, {:.2}] (IQR {:.2})\n",
            bounds.lower, bounds.upper, bounds.iqr
        ));
    }
    if let Some(b) = &cohort.box_summary {
        output.push_str(&format!(
            "  Box:      whiskers {:.2} .. {:.2}, {} fliers\n",
            b.whisker_low, b.whisker_high, b.flier_count
        ));
    }
    output
}

fn format_histogram(report: &Report) -> String {
    let mut output = String::from("\n=== Histogram ===\n");
    let edges = &report.bin_edges;
    let width = edges.get(1).copied().unwrap_or(0.0) - edges[0];
    output.push_str(&format!(
        "Bins: {} (width {}, 0 .. {}), {} calls binned\n",
        edges.len().saturating_sub(1),
        width,
        edges.last().copied().unwrap_or(0.0),
        report.primary.histogram.total()
    ));

    let comparison = report.comparison.as_ref().map(|c| &c.histogram.counts);
    for (i, count) in report.primary.histogram.counts.iter().enumerate() {
        let other = comparison.and_then(|c| c.get(i)).copied().unwrap_or(0);
        if *count == 0 && other == 0 {
            continue;
        }
        let closing = if i + 2 == edges.len() { "]" } else { ")" };
        let mut line = format!("  [{:>8.2}, {:>8.2}{} {:>6}", edges[i], edges[i + 1], closing, count);
        if comparison.is_some() {
            line.push_str(&format!(" | {:>6}", other));
        }
        output.push_str(&line);
        output.push('\n');
    }

    if let Some(density) = &report.primary.histogram.density {
        output.push_str(&format!("Density bandwidth: {:.3}\n", density.bandwidth));
    }
    output
}

fn format_categories(report: &Report) -> String {
    let mut output = String::from("\n=== Classification distribution ===\n");
    if report.categories.is_empty() {
        output.push_str("  No data\n");
        return output;
    }
    for share in &report.categories.categories {
        output.push_str(&format!("  {:<18} {:>6.1}%", share.short_label, share.primary));
        if let Some(c) = share.comparison {
            output.push_str(&format!(" | {:>6.1}%", c));
        }
        output.push('\n');
    }
    output
}

fn format_outliers(report: &Report) -> String {
    let mut output = String::from("\n=== Outliers ===\n");
    let headers = report.outliers.headers();
    output.push_str(&format!(
        "{:>14} {:<20} {:<22} {:<12} {:<17} {}\n",
        headers[0], headers[1], headers[2], headers[3], headers[4], headers[5]
    ));
    output.push_str(RULE);
    output.push('\n');
    for row in report.outliers.display_rows() {
        output.push_str(&format!(
            "{:>14} {:<20} {:<22} {:<12} {:<17} {}\n",
            row.talking_time, row.agent, row.classification, row.shift, row.direction, row.start
        ));
    }
    output
}

fn format_agents(report: &Report) -> String {
    let mut output = String::from("\n=== Outliers by agent ===\n");
    let headers = report.agents.headers();
    output.push_str(&format!("{:<17} {:>10} {:>8}\n", headers[0], headers[1], headers[2]));
    for row in report.agents.display_rows() {
        output.push_str(&format!("{:<17} {:>10} {:>8}\n", row.name, row.count, row.percentage));
    }
    output
}

fn format_advanced(report: &Report) -> String {
    let advanced = &report.advanced;
    let mut output = String::from("\n=== Activity (weekday x hour) ===\n");
    match &advanced.activity_heatmap {
        Some(heatmap) => {
            output.push_str(&format!("  Calls: {}", heatmap.total()));
            if let Some((day, hour, count)) = heatmap.peak() {
                output.push_str(&format!(
                    ", busiest {} {:02}:00 ({} calls)",
                    DAY_LABELS[day], hour, count
                ));
            }
            if heatmap.skipped > 0 {
                output.push_str(&format!(", {} without start time", heatmap.skipped));
            }
            output.push('\n');
        }
        None => output.push_str("  No temporal data\n"),
    }

    output.push_str("\n=== Daily talking time ===\n");
    match &advanced.daily_series {
        Some(series) if !series.is_empty() => {
            for point in series {
                output.push_str(&format!(
                    "  {}  mean {:>8}  median {:>8}  calls {}\n",
                    point.date,
                    opt(point.mean),
                    opt(point.median),
                    point.count
                ));
            }
        }
        _ => output.push_str("  No temporal data\n"),
    }

    output.push_str("\n=== Agent ranking (lowest mean talking time) ===\n");
    match &advanced.agent_performance {
        Some(ranking) if !ranking.is_empty() => {
            for agent in ranking {
                output.push_str(&format!(
                    "  {:<24} {:>8.2}  ({} calls)\n",
                    agent.agent_name, agent.mean, agent.count
                ));
            }
        }
        _ => output.push_str("  No agent data\n"),
    }

    output.push_str("\n=== Correlation ===\n");
    match &advanced.correlation {
        Some(matrix) => {
            output.push_str(&format!("  {:<17}", ""));
            for column in &matrix.columns {
                output.push_str(&format!("{:>17}", column));
            }
            output.push('\n');
            for (name, row) in matrix.columns.iter().zip(&matrix.values) {
                output.push_str(&format!("  {:<17}", name));
                for value in row {
                    output.push_str(&format!("{:>17}", opt(*value)));
                }
                output.push('\n');
            }
        }
        None => output.push_str("  No data\n"),
    }
    output
}

/// Render the full report as text
pub fn format_report(report: &Report) -> String {
    let mut output = String::from("=== Talking Time Analysis ===\n");
    output.push_str(&format!("Classification: {}\n", report.classification));

    if report.no_data {
        output.push_str("\nNo data matches the current filters.\n");
        return output;
    }

    output.push('\n');
    output.push_str(&cohort_title("Primary", &report.primary));
    output.push_str(&format_stats(&report.primary.stats, &report.primary));

    if let Some(comparison) = &report.comparison {
        output.push('\n');
        output.push_str(&cohort_title("Comparison", comparison));
        output.push_str(&format_stats(&comparison.stats, comparison));

        output.push_str("\n=== Difference (comparison - primary) ===\n");
        match &report.diff {
            Some(diff) => {
                output.push_str(&format!("  Mean:     {:+.2}\n", diff.mean_diff));
                output.push_str(&format!("  Median:   {:+.2}\n", diff.median_diff));
                output.push_str(&format!("  Std Dev:  {}\n", signed(diff.std_diff)));
            }
            None => output.push_str("  Not available: one cohort is empty\n"),
        }
    }

    output.push_str(&format_histogram(report));
    output.push_str(&format_categories(report));
    output.push_str(&format_outliers(report));
    output.push_str(&format_agents(report));
    output.push_str(&format_advanced(report));
    output
}
