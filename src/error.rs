//! Error taxonomy for the analysis pipeline
//!
//! Validation errors abort a single recomputation before any result is
//! replaced. Load errors never escape `loader::load_or_synthesize`; they only
//! decide whether the synthetic fallback dataset is used.

use thiserror::Error;

/// Errors raised while validating user-entered analysis parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("'{value}' is not a valid number for {field}")]
    NotANumber { field: &'static str, value: String },

    #[error("bin width must be greater than 0, got {0}")]
    NonPositiveBinWidth(f64),

    #[error("trim fraction must be between 0 and 1 (1 excluded), got {0}")]
    TrimFractionOutOfRange(f64),

    #[error("no groups selected: select at least one group")]
    EmptyGroupSelection,

    #[error("bin width {bin_width} would need {edges:.0} histogram bin edges (limit {limit}); use a wider bin")]
    TooManyBins {
        bin_width: f64,
        edges: f64,
        limit: usize,
    },
}

impl ValidationError {
    /// Short title for the message, as shown above the description
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::NotANumber { .. } => "Input error",
            ValidationError::NonPositiveBinWidth(_)
            | ValidationError::TrimFractionOutOfRange(_)
            | ValidationError::TooManyBins { .. } => "Validation error",
            ValidationError::EmptyGroupSelection => "No groups selected",
        }
    }
}

/// Errors that can occur while reading a call dataset from disk
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data file is empty")]
    EmptyFile,

    #[error("required column missing: {0}")]
    MissingColumn(String),

    #[error("line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// A start timestamp that could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized timestamp: '{0}'")]
pub struct TimestampParseError(pub String);
