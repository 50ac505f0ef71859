//! Analysis configuration: defaults, TOML file loading and resolution
//! against a loaded dataset
//!
//! Precedence is CLI flags over file values over the defaults below.

use crate::dataset::{Column, Dataset};
use crate::error::ValidationError;
use crate::pipeline::AnalysisParams;
use crate::selection::CohortSelection;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Group identifiers offered for selection
pub const KNOWN_GROUPS: [&str; 8] = [
    "ap_connection",
    "byl",
    "capa",
    "diana",
    "josefina_marcos",
    "melanie_naty",
    "yasmin_marina",
    "romi",
];

pub const DEFAULT_BIN_WIDTH: &str = "1.0";
pub const DEFAULT_TRIM: &str = "0.02";

/// Used when the dataset has no classification values
pub const FALLBACK_CLASSIFICATION: &str = "Cae Muda o Cortada";
/// Used when the dataset has no shift values
pub const FALLBACK_SHIFT: &str = "TT";

/// One cohort's filter panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CohortConfig {
    pub groups: Vec<String>,
    /// `None` picks the first shift present in the dataset
    pub shift: Option<String>,
    pub trim: String,
}

impl CohortConfig {
    fn with_groups(groups: &[&str]) -> Self {
        Self {
            groups: groups.iter().map(|g| g.to_string()).collect(),
            shift: None,
            trim: DEFAULT_TRIM.to_string(),
        }
    }

    fn selection(&self, default_shift: &str) -> CohortSelection {
        CohortSelection {
            groups: self.groups.clone(),
            shift: self.shift.clone().unwrap_or_else(|| default_shift.to_string()),
            trim: self.trim.clone(),
        }
    }
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self::with_groups(&KNOWN_GROUPS[..3])
    }
}

/// Full analysis configuration
///
/// # Example
/// ```
/// use talktime::config::AnalysisConfig;
///
/// let config = AnalysisConfig::from_toml_str(r#"
///     bin_width = "5"
///     comparison_enabled = true
///
///     [comparison]
///     groups = ["romi"]
///     shift = "TM"
/// "#).unwrap();
/// assert_eq!(config.primary.groups, vec!["ap_connection", "byl", "capa"]);
/// assert_eq!(config.comparison.shift.as_deref(), Some("TM"));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Semicolon-separated data file; the synthetic dataset is used when unset
    pub data_path: Option<PathBuf>,
    /// `None` picks the first classification present in the dataset
    pub classification: Option<String>,
    pub bin_width: String,
    pub show_density_curve: bool,
    pub comparison_enabled: bool,
    pub primary: CohortConfig,
    pub comparison: CohortConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            classification: None,
            bin_width: DEFAULT_BIN_WIDTH.to_string(),
            show_density_curve: false,
            comparison_enabled: false,
            primary: CohortConfig::default(),
            comparison: CohortConfig::with_groups(&KNOWN_GROUPS[3..6]),
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML for
    /// this layout. Value ranges are checked separately by `validate`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML analysis config")
    }

    /// Analysis parameters with dataset-dependent defaults filled in
    ///
    /// Classification and shifts default to the first sorted value present
    /// in the dataset.
    pub fn resolve(&self, dataset: &Dataset) -> AnalysisParams {
        let classification = dataset
            .distinct(Column::Classification)
            .into_iter()
            .next()
            .unwrap_or_else(|| FALLBACK_CLASSIFICATION.to_string());
        let shift = dataset
            .distinct(Column::Shift)
            .into_iter()
            .next()
            .unwrap_or_else(|| FALLBACK_SHIFT.to_string());
        self.resolve_with(&classification, &shift)
    }

    fn resolve_with(&self, default_classification: &str, default_shift: &str) -> AnalysisParams {
        AnalysisParams {
            primary: self.primary.selection(default_shift),
            comparison: self
                .comparison_enabled
                .then(|| self.comparison.selection(default_shift)),
            classification: self
                .classification
                .clone()
                .unwrap_or_else(|| default_classification.to_string()),
            bin_width: self.bin_width.clone(),
            show_density_curve: self.show_density_curve,
        }
    }

    /// Run the same checks an analysis run performs
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.resolve_with(FALLBACK_CLASSIFICATION, FALLBACK_SHIFT)
            .validate()
            .map(|_| ())
    }
}
