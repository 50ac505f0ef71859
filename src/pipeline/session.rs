use super::analysis::run_analysis;
use super::params::AnalysisParams;
use super::report::Report;
use crate::agents::AgentColumn;
use crate::dataset::Dataset;
use crate::error::ValidationError;
use crate::outliers::OutlierColumn;

/// Interactive state: the loaded dataset and the last successful report
///
/// A rejected refresh leaves the previous report in place. Table sort
/// state lives inside the report, so it resets whenever a new report
/// replaces the old one.
#[derive(Debug)]
pub struct AnalysisSession {
    dataset: Dataset,
    params: Option<AnalysisParams>,
    report: Option<Report>,
}

impl AnalysisSession {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            params: None,
            report: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn params(&self) -> Option<&AnalysisParams> {
        self.params.as_ref()
    }

    /// Recompute everything for `params`
    pub fn refresh(&mut self, params: AnalysisParams) -> Result<&Report, ValidationError> {
        let report = run_analysis(&self.dataset, &params)?;
        self.params = Some(params);
        Ok(self.report.insert(report))
    }

    /// Swap in a new dataset and rerun the last accepted parameters
    ///
    /// Returns the previous dataset. Without accepted parameters there is
    /// nothing to rerun and the report is cleared.
    pub fn reload(&mut self, dataset: Dataset) -> Result<Dataset, ValidationError> {
        let previous = std::mem::replace(&mut self.dataset, dataset);
        tracing::info!(
            "Reloaded dataset: {} records (was {})",
            self.dataset.len(),
            previous.len()
        );
        match self.params.clone() {
            Some(params) => {
                self.refresh(params)?;
            }
            None => self.report = None,
        }
        Ok(previous)
    }

    /// Header click on the outlier table; `false` when there is no report
    pub fn sort_outliers(&mut self, column: OutlierColumn) -> bool {
        match self.report.as_mut() {
            Some(report) => {
                report.outliers.sort(column);
                true
            }
            None => false,
        }
    }

    /// Header click on the agent table; `false` when there is no report
    pub fn sort_agents(&mut self, column: AgentColumn) -> bool {
        match self.report.as_mut() {
            Some(report) => {
                report.agents.sort(column);
                true
            }
            None => false,
        }
    }
}
