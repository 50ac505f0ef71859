use crate::error::ValidationError;
use crate::selection::{
    parse_bin_width, parse_trim_fraction, validate_groups, CohortSelection, ValidCohort,
    FIELD_COMPARISON_TRIM, FIELD_TRIM,
};
use serde::Serialize;

/// Everything one analysis run needs besides the dataset
///
/// The comparison cohort shares the primary classification; only its groups,
/// shift and trim fraction are its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisParams {
    pub primary: CohortSelection,
    /// `None` when comparison is disabled
    pub comparison: Option<CohortSelection>,
    pub classification: String,
    /// Bin width as typed
    pub bin_width: String,
    pub show_density_curve: bool,
}

/// Parameters with every numeric text field parsed and checked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedParams {
    pub primary: ValidCohort,
    /// `None` when comparison is disabled or no comparison group is selected
    pub comparison: Option<ValidCohort>,
    pub classification: String,
    pub bin_width: f64,
    pub show_density_curve: bool,
}

impl AnalysisParams {
    /// Validate in the order the fields are presented to the user:
    /// primary groups, bin width, primary trim, comparison trim
    pub fn validate(&self) -> Result<ValidatedParams, ValidationError> {
        validate_groups(&self.primary.groups)?;
        let bin_width = parse_bin_width(&self.bin_width)?;
        let primary = self.primary.validate(FIELD_TRIM)?;

        let comparison = match &self.comparison {
            Some(selection) => {
                parse_trim_fraction(&selection.trim, FIELD_COMPARISON_TRIM)?;
                if selection.has_groups() {
                    Some(selection.validate(FIELD_COMPARISON_TRIM)?)
                } else {
                    tracing::info!("Comparison enabled without groups, comparing nothing");
                    None
                }
            }
            None => None,
        };

        Ok(ValidatedParams {
            primary,
            comparison,
            classification: self.classification.clone(),
            bin_width,
            show_density_curve: self.show_density_curve,
        })
    }
}
