//! CLI argument parsing for talktime

use crate::agents::AgentColumn;
use crate::config::AnalysisConfig;
use crate::outliers::OutlierColumn;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV of the outlier table
    Csv,
}

/// Outlier table column, as named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutlierSortArg {
    Time,
    Agent,
    Classification,
    Shift,
    Direction,
    Start,
}

impl From<OutlierSortArg> for OutlierColumn {
    fn from(arg: OutlierSortArg) -> Self {
        match arg {
            OutlierSortArg::Time => OutlierColumn::TalkingTime,
            OutlierSortArg::Agent => OutlierColumn::Agent,
            OutlierSortArg::Classification => OutlierColumn::Classification,
            OutlierSortArg::Shift => OutlierColumn::Shift,
            OutlierSortArg::Direction => OutlierColumn::Direction,
            OutlierSortArg::Start => OutlierColumn::Start,
        }
    }
}

/// Agent table column, as named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AgentSortArg {
    Name,
    Count,
    Percentage,
}

impl From<AgentSortArg> for AgentColumn {
    fn from(arg: AgentSortArg) -> Self {
        match arg {
            AgentSortArg::Name => AgentColumn::Name,
            AgentSortArg::Count => AgentColumn::Count,
            AgentSortArg::Percentage => AgentColumn::Percentage,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "talktime")]
#[command(version)]
#[command(about = "Call-center talking time analysis with outlier detection", long_about = None)]
pub struct Cli {
    /// Semicolon-separated call export (synthetic data is used if missing or malformed)
    #[arg(short = 'd', long = "data", value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// TOML analysis config; flags override its values
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Primary cohort groups (comma-separated)
    #[arg(short = 'g', long = "groups", value_name = "GROUPS", value_delimiter = ',')]
    pub groups: Option<Vec<String>>,

    /// Classification shared by both cohorts
    #[arg(long = "classification", value_name = "NAME")]
    pub classification: Option<String>,

    /// Primary cohort shift
    #[arg(long = "shift", value_name = "SHIFT")]
    pub shift: Option<String>,

    /// Histogram bin width in seconds
    #[arg(short = 'w', long = "bin-width", value_name = "TEXT")]
    pub bin_width: Option<String>,

    /// Fraction of the primary cohort's upper tail to drop (0 to 1)
    #[arg(short = 't', long = "trim", value_name = "TEXT")]
    pub trim: Option<String>,

    /// Overlay a density curve on the histograms
    #[arg(long = "density")]
    pub density: bool,

    /// Enable the comparison cohort
    #[arg(long = "compare")]
    pub compare: bool,

    /// Comparison cohort groups (comma-separated)
    #[arg(long = "compare-groups", value_name = "GROUPS", value_delimiter = ',')]
    pub compare_groups: Option<Vec<String>>,

    /// Comparison cohort shift
    #[arg(long = "compare-shift", value_name = "SHIFT")]
    pub compare_shift: Option<String>,

    /// Fraction of the comparison cohort's upper tail to drop (0 to 1)
    #[arg(long = "compare-trim", value_name = "TEXT")]
    pub compare_trim: Option<String>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Click an outlier table header (repeatable, applied in order)
    #[arg(long = "sort-outliers", value_enum, value_name = "COLUMN")]
    pub sort_outliers: Vec<OutlierSortArg>,

    /// Click an agent table header (repeatable, applied in order)
    #[arg(long = "sort-agents", value_enum, value_name = "COLUMN")]
    pub sort_agents: Vec<AgentSortArg>,

    /// Seed for the synthetic fallback dataset
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,

    /// List groups, classifications and shifts present in the data, then exit
    #[arg(long = "list-values")]
    pub list_values: bool,

    /// Log pipeline activity to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

fn group_list(groups: &[String]) -> Vec<String> {
    groups
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

impl Cli {
    /// Overlay the flags that were given onto `config`
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(path) = &self.data {
            config.data_path = Some(path.clone());
        }
        if let Some(groups) = &self.groups {
            config.primary.groups = group_list(groups);
        }
        if let Some(classification) = &self.classification {
            config.classification = Some(classification.clone());
        }
        if let Some(shift) = &self.shift {
            config.primary.shift = Some(shift.clone());
        }
        if let Some(width) = &self.bin_width {
            config.bin_width = width.clone();
        }
        if let Some(trim) = &self.trim {
            config.primary.trim = trim.clone();
        }
        if self.density {
            config.show_density_curve = true;
        }
        if self.compare {
            config.comparison_enabled = true;
        }
        if let Some(groups) = &self.compare_groups {
            config.comparison.groups = group_list(groups);
        }
        if let Some(shift) = &self.compare_shift {
            config.comparison.shift = Some(shift.clone());
        }
        if let Some(trim) = &self.compare_trim {
            config.comparison.trim = trim.clone();
        }
    }
}
