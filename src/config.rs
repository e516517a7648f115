//! Analysis configuration
//!
//! Every threshold the pipeline uses is a named parameter here so the core
//! stays testable against arbitrary values. The defaults reproduce the
//! published analysis.

use serde::{Deserialize, Serialize};

/// Decimal places used when rounding reported values
pub const DEFAULT_DECIMALS: u32 = 2;

/// Characters of a start string that hold the `YYYY-MM-DD` date
pub const DEFAULT_DATE_PREFIX_LEN: usize = 10;

/// Lower bound of the flight speed corridor (mph, exclusive)
pub const DEFAULT_MIN_FLIGHT_SPEED_MPH: f64 = 100.0;

/// Upper bound of the flight speed corridor (mph, exclusive).
/// The fastest commercial flights cruise around 660 mph; anything above this
/// bound is treated as a sensor error.
pub const DEFAULT_MAX_FLIGHT_SPEED_MPH: f64 = 700.0;

/// Minimum flight duration (hours, exclusive); shorter events are treated
/// as tracking glitches
pub const DEFAULT_MIN_FLIGHT_DURATION_HOURS: f64 = 0.5;

/// Days in the after-flight window, counting the flight day itself
pub const DEFAULT_AFFECTED_WINDOW_DAYS: u32 = 3;

/// Tunable thresholds for the full pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub decimals: u32,
    pub date_prefix_len: usize,
    pub min_flight_speed_mph: f64,
    pub max_flight_speed_mph: f64,
    pub min_flight_duration_hours: f64,
    pub affected_window_days: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
            date_prefix_len: DEFAULT_DATE_PREFIX_LEN,
            min_flight_speed_mph: DEFAULT_MIN_FLIGHT_SPEED_MPH,
            max_flight_speed_mph: DEFAULT_MAX_FLIGHT_SPEED_MPH,
            min_flight_duration_hours: DEFAULT_MIN_FLIGHT_DURATION_HOURS,
            affected_window_days: DEFAULT_AFFECTED_WINDOW_DAYS,
        }
    }
}
