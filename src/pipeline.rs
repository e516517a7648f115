//! Pipeline orchestration
//!
//! Public entry points for the full analysis. The pipeline composes the
//! three transforms linearly and attaches descriptive statistics plus run
//! provenance; it never prints — rendering belongs to the caller.

use chrono::Utc;
use uuid::Uuid;

use crate::aggregator::SleepAggregator;
use crate::classifier::FlightClassifier;
use crate::comparator::FlightEffectComparator;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::stats::describe;
use crate::types::{ActivityRecord, AnalysisReport, ReportProvenance, SleepEpisodeRecord};
use crate::{PRODUCER_NAME, SOMNAIR_VERSION};

/// Run the full analysis with default thresholds.
///
/// # Example
/// ```ignore
/// let report = somnair::analyze(&sleep_rows, &activity_rows)?;
/// println!("{}", serde_json::to_string_pretty(&report)?);
/// ```
pub fn analyze(
    sleep: &[SleepEpisodeRecord],
    activities: &[ActivityRecord],
) -> Result<AnalysisReport, AnalysisError> {
    Analyzer::new().analyze(sleep, activities)
}

/// Analyzer carrying a fixed configuration.
///
/// Stateless between calls: each run is a pure function of its inputs.
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Create an analyzer with default thresholds
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    /// Create an analyzer with custom thresholds
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run aggregation, classification, and comparison over the two tables.
    ///
    /// Pipeline stages:
    /// 1. SleepAggregator - collapse episodes into per-day totals
    /// 2. FlightClassifier - extract flights from activities
    /// 3. FlightEffectComparator - window, partition, t-test, Cohen's d
    pub fn analyze(
        &self,
        sleep: &[SleepEpisodeRecord],
        activities: &[ActivityRecord],
    ) -> Result<AnalysisReport, AnalysisError> {
        let config = &self.config;

        let daily_sleep =
            SleepAggregator::aggregate(sleep, config.date_prefix_len, config.decimals);
        let sleep_hours: Vec<f64> = daily_sleep.iter().map(|d| d.actual_hours).collect();
        let sleep_stats = describe(&sleep_hours, "daily sleep", config.decimals)?;

        let flights = FlightClassifier::classify(activities, config);
        let flight_hours: Vec<f64> = flights.iter().map(|f| f.duration_hours).collect();
        let flight_stats = describe(&flight_hours, "flight duration", config.decimals)?;

        let comparison = FlightEffectComparator::compare(&flights, &daily_sleep, config)?;

        Ok(AnalysisReport {
            provenance: ReportProvenance {
                producer: PRODUCER_NAME.to_string(),
                version: SOMNAIR_VERSION.to_string(),
                run_id: Uuid::new_v4().to_string(),
                computed_at_utc: Utc::now(),
            },
            flight_count: flights.len(),
            daily_sleep,
            sleep_stats,
            flights,
            flight_stats,
            comparison,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn episode(start: &str, minutes: f64) -> SleepEpisodeRecord {
        SleepEpisodeRecord {
            start_time_iso: start.to_string(),
            actual_minutes: minutes,
        }
    }

    fn activity(start: &str, seconds: f64, miles: f64, label: &str) -> ActivityRecord {
        ActivityRecord {
            start: start.to_string(),
            duration_seconds: seconds,
            distance_miles: miles,
            activity_label: label.to_string(),
        }
    }

    fn sample_inputs() -> (Vec<SleepEpisodeRecord>, Vec<ActivityRecord>) {
        let sleep = vec![
            episode("2014-03-20T23:00:00Z", 486.0),
            episode("2014-03-21T23:30:00Z", 474.0),
            episode("2014-03-22T22:45:00Z", 480.0),
            // Two episodes on the flight day: a nap plus the night
            episode("2014-03-23T14:00:00Z", 60.0),
            episode("2014-03-23T23:59:00Z", 240.0),
            episode("2014-03-24T23:10:00Z", 330.0),
            episode("2014-03-25T22:00:00Z", 360.0),
            episode("2014-03-26T23:00:00Z", 492.0),
        ];
        let activities = vec![
            activity("2014-03-23 10:00:00", 18000.0, 2500.0, "airplane"),
            // Ground transport the day before, must not widen the window
            activity("2014-03-22 09:00:00", 3600.0, 60.0, "transport"),
        ];
        (sleep, activities)
    }

    #[test]
    fn test_analyze_end_to_end() {
        let (sleep, activities) = sample_inputs();
        let report = analyze(&sleep, &activities).unwrap();

        assert_eq!(report.daily_sleep.len(), 7);
        assert_eq!(report.flight_count, 1);
        assert_eq!(report.flights[0].day, "2014-03-23");
        assert_eq!(report.flights[0].duration_hours, 5.0);

        // Flight window covers 03-23..03-25: the three short nights
        assert_eq!(report.comparison.flight_sleeps, vec![5.0, 5.5, 6.0]);
        assert_eq!(report.comparison.baseline_sleeps.len(), 4);
        assert!(report.comparison.t_test.p_value < 0.05);
        assert!(report.comparison.effect.effect_size < 0.0);

        assert_eq!(report.sleep_stats.label, "daily sleep");
        assert_eq!(report.flight_stats.label, "flight duration");
        assert_eq!(report.provenance.producer, "somnair");
    }

    #[test]
    fn test_analyze_is_deterministic_apart_from_provenance() {
        let (sleep, activities) = sample_inputs();
        let a = analyze(&sleep, &activities).unwrap();
        let b = analyze(&sleep, &activities).unwrap();

        assert_eq!(a.daily_sleep, b.daily_sleep);
        assert_eq!(a.flights, b.flights);
        assert_eq!(a.comparison.t_test, b.comparison.t_test);
        assert_eq!(a.comparison.effect, b.comparison.effect);
        assert_ne!(a.provenance.run_id, b.provenance.run_id);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let (sleep, activities) = sample_inputs();
        let report = analyze(&sleep, &activities).unwrap();

        let json = serde_json::to_string(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["provenance"]["producer"], "somnair");
        assert_eq!(value["flight_count"], 1);
        assert_eq!(value["comparison"]["effect"]["magnitude"], "large");
    }

    #[test]
    fn test_no_flights_propagates_insufficient_sample() {
        let (sleep, _) = sample_inputs();
        let activities = vec![activity("2014-03-23 10:00:00", 3600.0, 30.0, "transport")];
        let err = analyze(&sleep, &activities).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientSample { .. }));
    }
}
