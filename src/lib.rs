//! somnair - flight-effect sleep analysis for wearable device data
//!
//! Somnair ingests two tabular wearable exports — sleep episodes and general
//! activities — and measures how airline travel affects nightly sleep through
//! a deterministic pipeline: daily sleep aggregation → flight classification
//! → after-flight windowing → two-group comparison (t-test, Cohen's d).
//!
//! Every transform is a pure function of its inputs; the library never
//! prints. The optional `cli` feature builds the `somnair` binary that loads
//! the CSVs and renders reports.

pub mod aggregator;
pub mod classifier;
pub mod comparator;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod stats;
pub mod types;

pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use pipeline::{analyze, Analyzer};
pub use types::{
    ActivityRecord, AnalysisReport, CohensD, DailySleepRecord, EffectMagnitude, FlightComparison,
    FlightRecord, SleepEpisodeRecord, SummaryStats, TTestResult,
};

/// Crate version embedded in report provenance
pub const SOMNAIR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report provenance
pub const PRODUCER_NAME: &str = "somnair";
