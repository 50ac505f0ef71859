// Filtering → aggregation → outlier detection pipeline
//
// One run takes the dataset plus the user's cohort selections and yields a
// complete `Report`. Every input is validated before any record is touched,
// so a rejected run never produces a partial report.
//
// Control flow:
//   Dataset → filter (per cohort) → trim (per cohort, own threshold)
//     → {describe, detect} → tag_and_merge → aggregate_by_agent
//     → compute_bins (shared edges) → histograms
//   group+shift filter → category distribution
//   untrimmed primary cohort → temporal / agent ranking / correlation

mod analysis;
mod params;
mod report;
mod session;

pub use analysis::run_analysis;
pub use params::{AnalysisParams, ValidatedParams};
pub use report::{AdvancedPanels, CohortReport, Report, REPORT_VERSION};
pub use session::AnalysisSession;

#[cfg(test)]
mod tests;
