//! Core types for the somnair pipeline
//!
//! This module defines the records that flow through each stage of the
//! pipeline: raw episode/activity rows, derived daily and flight tables,
//! and the statistical result bundles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded sleep interval from the wearable.
///
/// A day may hold several episodes (naps plus the main sleep).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepEpisodeRecord {
    /// Sleep start in ISO-8601-like form; the first 10 characters are the
    /// calendar date `YYYY-MM-DD`
    pub start_time_iso: String,
    /// Recorded sleep duration (minutes)
    pub actual_minutes: f64,
}

/// One tracked activity from the wearable.
///
/// Field renames match the CSV headers the device exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Activity start date-time
    #[serde(rename = "Start")]
    pub start: String,
    /// Activity duration (seconds)
    #[serde(rename = "Duration")]
    pub duration_seconds: f64,
    /// Distance travelled (miles)
    #[serde(rename = "Distance")]
    pub distance_miles: f64,
    /// Free-text activity category, notably "airplane" or "transport"
    #[serde(rename = "Activity")]
    pub activity_label: String,
}

/// Total sleep for one calendar day (derived)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySleepRecord {
    /// Date string, unique key within the table
    pub day: String,
    /// Sum of that day's episode minutes / 60, rounded
    pub actual_hours: f64,
}

/// One classified flight (derived)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Date string of the flight's start
    pub day: String,
    /// Flight duration (hours, rounded)
    pub duration_hours: f64,
}

/// Descriptive statistics bundle for one column of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Caller-supplied label, e.g. "daily sleep"
    pub label: String,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (ddof = 1); `None` below 2 observations
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    /// Number of observations
    pub count: usize,
}

/// Independent two-sample Student's t-test result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    /// t statistic
    pub statistic: f64,
    /// Two-tailed p-value
    pub p_value: f64,
    /// Degrees of freedom (n1 + n2 - 2)
    pub df: f64,
}

/// Magnitude band for a standardized effect size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectMagnitude {
    Trivial,
    Small,
    Medium,
    Large,
}

impl EffectMagnitude {
    /// Classify an effect size by its absolute value.
    ///
    /// Bands: |d| < 0.2 trivial, < 0.5 small, < 0.8 medium, else large.
    pub fn classify(effect_size: f64) -> Self {
        let abs = effect_size.abs();
        if abs < 0.2 {
            EffectMagnitude::Trivial
        } else if abs < 0.5 {
            EffectMagnitude::Small
        } else if abs < 0.8 {
            EffectMagnitude::Medium
        } else {
            EffectMagnitude::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectMagnitude::Trivial => "trivial",
            EffectMagnitude::Small => "small",
            EffectMagnitude::Medium => "medium",
            EffectMagnitude::Large => "large",
        }
    }
}

impl std::fmt::Display for EffectMagnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cohen's d effect size with its magnitude band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohensD {
    /// Pooled-standard-deviation standardized mean difference, rounded
    pub effect_size: f64,
    pub magnitude: EffectMagnitude,
}

/// Two-group comparison of nightly sleep duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightComparison {
    /// Sleep hours on flight-affected nights
    pub flight_sleeps: Vec<f64>,
    /// Sleep hours on all other nights
    pub baseline_sleeps: Vec<f64>,
    pub t_test: TTestResult,
    pub effect: CohensD,
}

/// Run provenance attached to every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProvenance {
    pub producer: String,
    pub version: String,
    pub run_id: String,
    pub computed_at_utc: DateTime<Utc>,
}

/// Complete output of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub provenance: ReportProvenance,
    pub daily_sleep: Vec<DailySleepRecord>,
    pub sleep_stats: SummaryStats,
    pub flights: Vec<FlightRecord>,
    pub flight_count: usize,
    pub flight_stats: SummaryStats,
    pub comparison: FlightComparison,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_bands() {
        assert_eq!(EffectMagnitude::classify(0.0), EffectMagnitude::Trivial);
        assert_eq!(EffectMagnitude::classify(0.19), EffectMagnitude::Trivial);
        assert_eq!(EffectMagnitude::classify(0.2), EffectMagnitude::Small);
        assert_eq!(EffectMagnitude::classify(0.49), EffectMagnitude::Small);
        assert_eq!(EffectMagnitude::classify(0.5), EffectMagnitude::Medium);
        assert_eq!(EffectMagnitude::classify(0.79), EffectMagnitude::Medium);
        assert_eq!(EffectMagnitude::classify(0.8), EffectMagnitude::Large);
        assert_eq!(EffectMagnitude::classify(3.2), EffectMagnitude::Large);
    }

    #[test]
    fn test_magnitude_uses_absolute_value() {
        // Negative effects land in the same band as their positive mirror
        assert_eq!(EffectMagnitude::classify(-0.1), EffectMagnitude::Trivial);
        assert_eq!(EffectMagnitude::classify(-0.3), EffectMagnitude::Small);
        assert_eq!(EffectMagnitude::classify(-0.6), EffectMagnitude::Medium);
        assert_eq!(EffectMagnitude::classify(-1.5), EffectMagnitude::Large);
    }

    #[test]
    fn test_magnitude_serialization() {
        let json = serde_json::to_string(&EffectMagnitude::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}
