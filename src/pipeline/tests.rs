// Pipeline scenarios over small hand-built datasets
//
// Each dataset is small enough that every quartile and fence can be checked
// by hand.

use super::*;
use crate::agents::{AgentColumn, AgentSummary};
use crate::dataset::{Dataset, Record};
use crate::error::ValidationError;
use crate::outliers::{CohortTag, OutlierColumn};
use crate::selection::CohortSelection;
use crate::sort::SortDirection;

fn call(group: &str, shift: &str, tt: f64, agent: &str) -> Record {
    Record::new(group, "X", shift, tt)
        .with_agent(agent)
        .with_start("2024-03-04 10:00:00")
}

/// Group A on TT: ten calls around 10s plus one 200s call by "slow".
/// Group B on TM: eight calls around 20s plus one 300s call by "ana".
fn dataset() -> Dataset {
    let mut records = Vec::new();
    for (i, tt) in [10.0, 11.0, 9.0, 10.0, 12.0, 10.0, 11.0, 9.0, 10.0, 10.0]
        .iter()
        .enumerate()
    {
        let agent = if i % 2 == 0 { "ana" } else { "bea" };
        records.push(call("A", "TT", *tt, agent));
    }
    records.push(call("A", "TT", 200.0, "slow"));
    for tt in [20.0, 21.0, 19.0, 20.0, 22.0, 20.0, 19.0, 20.0] {
        records.push(call("B", "TM", tt, "carla"));
    }
    records.push(call("B", "TM", 300.0, "ana"));
    records.push(Record::new("A", "Y", "TT", 5.0).with_agent("ana"));
    Dataset::from_records(records)
}

fn params(primary: &[&str], comparison: Option<&[&str]>) -> AnalysisParams {
    AnalysisParams {
        primary: CohortSelection::new(primary, "TT", "0"),
        comparison: comparison.map(|groups| CohortSelection::new(groups, "TM", "0")),
        classification: "X".to_string(),
        bin_width: "10".to_string(),
        show_density_curve: false,
    }
}

#[test]
fn test_primary_only_run() {
    let report = run_analysis(&dataset(), &params(&["A"], None)).unwrap();
    assert!(!report.no_data);
    assert_eq!(report.primary.stats.count, 11);
    assert_eq!(report.primary.matched, 11);
    assert!(report.comparison.is_none());
    assert!(report.diff.is_none());

    assert_eq!(report.outliers.len(), 1);
    assert_eq!(report.outliers.rows()[0].record.talking_time, 200.0);
    assert_eq!(*report.bin_edges.last().unwrap(), 200.0);
    assert_eq!(report.primary.histogram.total(), 11);
}

#[test]
fn test_comparison_run_merges_and_diffs() {
    let report = run_analysis(&dataset(), &params(&["A"], Some(&["B"]))).unwrap();
    let comparison = report.comparison.as_ref().unwrap();
    assert_eq!(comparison.stats.count, 9);
    assert_eq!(report.primary.stats.median, Some(10.0));
    assert_eq!(comparison.stats.median, Some(20.0));
    assert_eq!(report.diff.unwrap().median_diff, 10.0);

    let tags: Vec<CohortTag> = report.outliers.rows().iter().map(|o| o.cohort).collect();
    assert_eq!(tags, vec![CohortTag::Primary, CohortTag::Comparison]);
    // Shared edges reach the comparison maximum
    assert_eq!(*report.bin_edges.last().unwrap(), 300.0);
    assert_eq!(comparison.histogram.counts.len(), report.primary.histogram.counts.len());
}

#[test]
fn test_agent_aggregate_over_merged_outliers() {
    let report = run_analysis(&dataset(), &params(&["A"], Some(&["B"]))).unwrap();
    let AgentSummary::Agents(rows) = report.agents.summary() else {
        panic!("expected agents");
    };
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|a| a.percentage == 50.0));
    assert_eq!(rows[0].agent_name, "slow");
}

#[test]
fn test_trim_thresholds_are_per_cohort() {
    let mut p = params(&["A"], Some(&["B"]));
    p.primary.trim = "0.1".to_string();
    let report = run_analysis(&dataset(), &p).unwrap();
    // The 200s call is above A's own 90th percentile; B is untouched
    assert_eq!(report.primary.stats.count, 10);
    assert_eq!(report.primary.stats.max, Some(12.0));
    assert_eq!(report.comparison.unwrap().stats.max, Some(300.0));
}

#[test]
fn test_no_data_when_nothing_matches() {
    let mut p = params(&["A"], Some(&["B"]));
    p.classification = "missing".to_string();
    let report = run_analysis(&dataset(), &p).unwrap();
    assert!(report.no_data);
    assert_eq!(report.bin_edges, vec![0.0, 10.0]);
    assert!(report.outliers.is_empty());
    assert_eq!(*report.agents.summary(), AgentSummary::NoData);
    assert_eq!(report.primary.stats.count, 0);
}

#[test]
fn test_comparison_only_data_is_not_no_data() {
    let report = run_analysis(&dataset(), &params(&["nobody"], Some(&["B"]))).unwrap();
    assert!(!report.no_data);
    assert_eq!(report.primary.stats.count, 0);
    assert!(report.diff.is_none());
    assert!(report.advanced.activity_heatmap.is_some());
    assert!(report.advanced.daily_series.is_none());
}

#[test]
fn test_category_distribution_ignores_classification() {
    let report = run_analysis(&dataset(), &params(&["A"], None)).unwrap();
    let labels: Vec<&str> = report
        .categories
        .categories
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(labels, vec!["X", "Y"]);
    let y = &report.categories.categories[1];
    assert!((y.primary - 100.0 / 12.0).abs() < 1e-12);
}

#[test]
fn test_advanced_panels_use_untrimmed_primary() {
    let mut p = params(&["A"], None);
    p.primary.trim = "0.5".to_string();
    let report = run_analysis(&dataset(), &p).unwrap();
    let heatmap = report.advanced.activity_heatmap.unwrap();
    assert_eq!(heatmap.counts[0][10], 11);
    let ranking = report.advanced.agent_performance.unwrap();
    assert_eq!(ranking[0].agent_name, "bea");
    assert_eq!(ranking[0].mean, 10.0);
    assert!(report.advanced.correlation.is_some());
}

#[test]
fn test_validation_error_stops_run() {
    let mut p = params(&["A"], None);
    p.bin_width = "-1".to_string();
    assert_eq!(
        run_analysis(&dataset(), &p),
        Err(ValidationError::NonPositiveBinWidth(-1.0))
    );
}

#[test]
fn test_session_keeps_report_on_validation_error() {
    let mut session = AnalysisSession::new(dataset());
    session.refresh(params(&["A"], None)).unwrap();
    let before = session.report().cloned();

    let err = session.refresh(params(&[], None)).unwrap_err();
    assert_eq!(err, ValidationError::EmptyGroupSelection);
    assert_eq!(session.report().cloned(), before);
    assert_eq!(session.params().unwrap().primary.groups, vec!["A"]);
}

#[test]
fn test_session_sorts_are_table_scoped() {
    let mut session = AnalysisSession::new(dataset());
    assert!(!session.sort_outliers(OutlierColumn::TalkingTime));
    session.refresh(params(&["A"], Some(&["B"]))).unwrap();

    assert!(session.sort_outliers(OutlierColumn::TalkingTime));
    assert!(session.sort_agents(AgentColumn::Name));
    let report = session.report().unwrap();
    let times: Vec<f64> = report
        .outliers
        .rows()
        .iter()
        .map(|o| o.record.talking_time)
        .collect();
    assert_eq!(times, vec![200.0, 300.0]);
    assert_eq!(report.agents.sort_state().direction, SortDirection::Ascending);
    assert_eq!(report.outliers.sort_state().column, Some(OutlierColumn::TalkingTime));
}

#[test]
fn test_refresh_resets_sort_state() {
    let mut session = AnalysisSession::new(dataset());
    session.refresh(params(&["A"], None)).unwrap();
    session.sort_outliers(OutlierColumn::Agent);
    session.refresh(params(&["A"], None)).unwrap();
    assert_eq!(session.report().unwrap().outliers.sort_state().column, None);
}

#[test]
fn test_session_reload_replaces_dataset() {
    let mut session = AnalysisSession::new(dataset());
    session.refresh(params(&["A"], None)).unwrap();

    let smaller = Dataset::from_records(vec![Record::new("A", "X", "TT", 42.0)]);
    let previous = session.reload(smaller).unwrap();
    assert_eq!(previous.len(), 21);
    assert_eq!(session.dataset().len(), 1);
    let report = session.report().unwrap();
    assert_eq!(report.primary.stats.mean, Some(42.0));
    assert!(report.outliers.is_empty());
}

#[test]
fn test_reload_without_params_clears_report() {
    let mut session = AnalysisSession::new(dataset());
    session.reload(Dataset::default()).unwrap();
    assert!(session.report().is_none());
}
