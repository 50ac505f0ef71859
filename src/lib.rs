//! Talktime - call-center talking time analysis
//!
//! This library loads a semicolon-separated call export, selects one or two
//! cohorts by group, classification and shift, and computes descriptive
//! statistics, shared-edge histograms, IQR outliers, per-agent outlier
//! shares and temporal panels. Reports render as text, JSON or CSV.

pub mod agents;
pub mod cli;
pub mod config;
pub mod correlation;
pub mod csv_output;
pub mod dataset;
pub mod display;
pub mod distribution;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod json_output;
pub mod loader;
pub mod outliers;
pub mod pipeline;
pub mod selection;
pub mod sort;
pub mod stats;
pub mod temporal;
pub mod text_output;
