use crate::agents::{AgentPerformance, AgentSummary, AgentTable};
use crate::correlation::CorrelationMatrix;
use crate::dataset::Record;
use crate::distribution::CategoryDistribution;
use crate::histogram::Histogram;
use crate::outliers::{OutlierBounds, OutlierTable};
use crate::selection::ValidCohort;
use crate::stats::{describe, BoxSummary, DescriptiveStats, StatsDiff};
use crate::temporal::{ActivityHeatmap, DailyPoint};
use serde::Serialize;

/// Report schema version, bumped on breaking changes to the JSON layout
pub const REPORT_VERSION: u32 = 1;

/// Everything computed for one cohort
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortReport {
    pub groups: Vec<String>,
    pub shift: String,
    pub trim_fraction: f64,
    /// Records matching the filter, before trimming
    pub matched: usize,
    /// Trimmed sub-population
    #[serde(skip)]
    pub records: Vec<Record>,
    pub stats: DescriptiveStats,
    pub box_summary: Option<BoxSummary>,
    pub histogram: Histogram,
    pub outlier_bounds: Option<OutlierBounds>,
    pub outlier_count: usize,
}

impl CohortReport {
    /// Cohort with no records
    pub(crate) fn empty(selection: &ValidCohort, bins: usize) -> Self {
        Self {
            groups: selection.groups.clone(),
            shift: selection.shift.clone(),
            trim_fraction: selection.trim_fraction,
            matched: 0,
            records: Vec::new(),
            stats: describe(&[]),
            box_summary: None,
            histogram: Histogram {
                counts: vec![0; bins],
                density: None,
            },
            outlier_bounds: None,
            outlier_count: 0,
        }
    }
}

/// Panels computed over the untrimmed primary cohort
///
/// Each panel is `None` when its source column is missing or the cohort
/// is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdvancedPanels {
    pub activity_heatmap: Option<ActivityHeatmap>,
    pub daily_series: Option<Vec<DailyPoint>>,
    pub agent_performance: Option<Vec<AgentPerformance>>,
    pub correlation: Option<CorrelationMatrix>,
}

/// Result of one successful analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub version: u32,
    pub classification: String,
    /// Neither cohort matched any record
    pub no_data: bool,
    pub primary: CohortReport,
    pub comparison: Option<CohortReport>,
    pub bin_edges: Vec<f64>,
    pub diff: Option<StatsDiff>,
    pub categories: CategoryDistribution,
    pub outliers: OutlierTable,
    pub agents: AgentTable,
    pub advanced: AdvancedPanels,
}

impl Report {
    /// Placeholder report: empty statistics, no outliers, no agents
    pub(crate) fn no_data(
        classification: &str,
        primary: &ValidCohort,
        comparison: Option<&ValidCohort>,
        bin_width: f64,
    ) -> Self {
        Self {
            version: REPORT_VERSION,
            classification: classification.to_string(),
            no_data: true,
            primary: CohortReport::empty(primary, 1),
            comparison: comparison.map(|c| CohortReport::empty(c, 1)),
            bin_edges: vec![0.0, bin_width],
            diff: None,
            categories: CategoryDistribution {
                categories: Vec::new(),
            },
            outliers: OutlierTable::new(Vec::new()),
            agents: AgentTable::new(AgentSummary::NoData),
            advanced: AdvancedPanels::default(),
        }
    }
}
