//! Cohort selection parameters and validation of user-entered text
//!
//! The primary and comparison panels are the same type instantiated twice.
//! Classification is chosen once and shared by both cohorts.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

pub const FIELD_BIN_WIDTH: &str = "bin width";
pub const FIELD_TRIM: &str = "trim fraction";
pub const FIELD_COMPARISON_TRIM: &str = "comparison trim fraction";

/// One filter panel as entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortSelection {
    pub groups: Vec<String>,
    pub shift: String,
    /// Fraction of the upper tail to discard, as typed
    pub trim: String,
}

/// A selection whose numeric text has been validated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidCohort {
    pub groups: Vec<String>,
    pub shift: String,
    pub trim_fraction: f64,
}

impl CohortSelection {
    pub fn new<S: AsRef<str>>(groups: &[S], shift: &str, trim: &str) -> Self {
        Self {
            groups: groups.iter().map(|g| g.as_ref().to_string()).collect(),
            shift: shift.to_string(),
            trim: trim.to_string(),
        }
    }

    pub fn has_groups(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Validate groups and trim text
    pub fn validate(&self, trim_field: &'static str) -> Result<ValidCohort, ValidationError> {
        validate_groups(&self.groups)?;
        Ok(ValidCohort {
            groups: dedup(&self.groups),
            shift: self.shift.clone(),
            trim_fraction: parse_trim_fraction(&self.trim, trim_field)?,
        })
    }
}

fn dedup(groups: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(groups.len());
    for g in groups {
        if !seen.contains(g) {
            seen.push(g.clone());
        }
    }
    seen
}

/// Require at least one selected group
pub fn validate_groups<S: AsRef<str>>(groups: &[S]) -> Result<(), ValidationError> {
    if groups.is_empty() {
        return Err(ValidationError::EmptyGroupSelection);
    }
    Ok(())
}

/// Parse text as a finite number
pub fn parse_number(text: &str, field: &'static str) -> Result<f64, ValidationError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::NotANumber {
            field,
            value: text.to_string(),
        })
}

/// Histogram bin width: a number greater than zero
pub fn parse_bin_width(text: &str) -> Result<f64, ValidationError> {
    let width = parse_number(text, FIELD_BIN_WIDTH)?;
    if width <= 0.0 {
        return Err(ValidationError::NonPositiveBinWidth(width));
    }
    Ok(width)
}

/// Trim fraction: a number in `[0, 1)`
pub fn parse_trim_fraction(text: &str, field: &'static str) -> Result<f64, ValidationError> {
    let fraction = parse_number(text, field)?;
    if !(0.0..1.0).contains(&fraction) {
        return Err(ValidationError::TrimFractionOutOfRange(fraction));
    }
    Ok(fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bin_width() {
        assert_eq!(parse_bin_width("2.5"), Ok(2.5));
        assert_eq!(parse_bin_width(" 1 "), Ok(1.0));
        assert_eq!(
            parse_bin_width("0"),
            Err(ValidationError::NonPositiveBinWidth(0.0))
        );
        assert_eq!(
            parse_bin_width("-3"),
            Err(ValidationError::NonPositiveBinWidth(-3.0))
        );
    }

    #[test]
    fn test_parse_bin_width_not_a_number() {
        assert_eq!(
            parse_bin_width("wide"),
            Err(ValidationError::NotANumber {
                field: FIELD_BIN_WIDTH,
                value: "wide".to_string()
            })
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            parse_bin_width("inf"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            parse_trim_fraction("NaN", FIELD_TRIM),
            Err(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_parse_trim_fraction_range() {
        assert_eq!(parse_trim_fraction("0", FIELD_TRIM), Ok(0.0));
        assert_eq!(parse_trim_fraction("0.02", FIELD_TRIM), Ok(0.02));
        assert_eq!(
            parse_trim_fraction("1", FIELD_TRIM),
            Err(ValidationError::TrimFractionOutOfRange(1.0))
        );
        assert_eq!(
            parse_trim_fraction("-0.1", FIELD_TRIM),
            Err(ValidationError::TrimFractionOutOfRange(-0.1))
        );
    }

    #[test]
    fn test_validate_empty_groups() {
        let selection = CohortSelection::new::<&str>(&[], "TT", "0.02");
        assert_eq!(
            selection.validate(FIELD_TRIM),
            Err(ValidationError::EmptyGroupSelection)
        );
    }

    #[test]
    fn test_validate_dedups_groups() {
        let selection = CohortSelection::new(&["byl", "capa", "byl"], "TT", "0");
        let valid = selection.validate(FIELD_TRIM).unwrap();
        assert_eq!(valid.groups, vec!["byl", "capa"]);
        assert_eq!(valid.trim_fraction, 0.0);
    }

    #[test]
    fn test_validate_reports_field_name() {
        let selection = CohortSelection::new(&["byl"], "TT", "abc");
        match selection.validate(FIELD_COMPARISON_TRIM) {
            Err(ValidationError::NotANumber { field, .. }) => {
                assert_eq!(field, FIELD_COMPARISON_TRIM)
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
