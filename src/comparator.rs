//! Flight-effect comparison
//!
//! Expands flight days into an after-flight window, partitions the daily
//! sleep table into flight-affected and baseline samples, and compares the
//! two with a t-test and Cohen's d.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::stats::{cohens_d, students_t_test};
use crate::types::{DailySleepRecord, FlightComparison, FlightRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Comparator for flight-affected vs. baseline sleep
pub struct FlightEffectComparator;

impl FlightEffectComparator {
    /// Expand distinct flight days into the affected-day set.
    ///
    /// Each flight day `d` contributes `{d, d+1, ..., d+window_days-1}`
    /// (the flight day plus the following days); windows from nearby
    /// flights are unioned and deduplicated. Flight days must parse as
    /// `YYYY-MM-DD` calendar dates.
    pub fn affected_days(
        flights: &[FlightRecord],
        window_days: u32,
    ) -> Result<BTreeSet<String>, AnalysisError> {
        let mut affected = BTreeSet::new();

        for flight in flights {
            let date = NaiveDate::parse_from_str(&flight.day, DATE_FORMAT)
                .map_err(|_| AnalysisError::DateParse(flight.day.clone()))?;
            for offset in 0..window_days {
                let day = date + Duration::days(i64::from(offset));
                affected.insert(day.format(DATE_FORMAT).to_string());
            }
        }

        Ok(affected)
    }

    /// Partition daily sleep hours into (flight-affected, baseline) samples.
    ///
    /// Exhaustive and disjoint: every record lands in exactly one sample.
    pub fn partition(
        daily: &[DailySleepRecord],
        affected: &BTreeSet<String>,
    ) -> (Vec<f64>, Vec<f64>) {
        let mut flight_sleeps = Vec::new();
        let mut baseline_sleeps = Vec::new();

        for record in daily {
            if affected.contains(&record.day) {
                flight_sleeps.push(record.actual_hours);
            } else {
                baseline_sleeps.push(record.actual_hours);
            }
        }

        (flight_sleeps, baseline_sleeps)
    }

    /// Run the full comparison: window, partition, t-test, Cohen's d.
    ///
    /// Either sample with fewer than 2 observations fails with
    /// `InsufficientSample` — zero flights included — rather than letting
    /// the arithmetic produce NaN.
    pub fn compare(
        flights: &[FlightRecord],
        daily: &[DailySleepRecord],
        config: &AnalysisConfig,
    ) -> Result<FlightComparison, AnalysisError> {
        let affected = Self::affected_days(flights, config.affected_window_days)?;
        let (flight_sleeps, baseline_sleeps) = Self::partition(daily, &affected);

        let t_test = students_t_test(&flight_sleeps, &baseline_sleeps)?;
        let effect = cohens_d(&flight_sleeps, &baseline_sleeps, config.decimals)?;

        Ok(FlightComparison {
            flight_sleeps,
            baseline_sleeps,
            t_test,
            effect,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flight(day: &str) -> FlightRecord {
        FlightRecord {
            day: day.to_string(),
            duration_hours: 5.0,
        }
    }

    fn sleep(day: &str, hours: f64) -> DailySleepRecord {
        DailySleepRecord {
            day: day.to_string(),
            actual_hours: hours,
        }
    }

    #[test]
    fn test_single_flight_window() {
        let affected = FlightEffectComparator::affected_days(&[flight("2014-03-23")], 3).unwrap();
        let expected: BTreeSet<String> = ["2014-03-23", "2014-03-24", "2014-03-25"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(affected, expected);
    }

    #[test]
    fn test_window_rolls_over_month_and_year() {
        let affected = FlightEffectComparator::affected_days(&[flight("2014-12-31")], 3).unwrap();
        assert!(affected.contains("2014-12-31"));
        assert!(affected.contains("2015-01-01"));
        assert!(affected.contains("2015-01-02"));
    }

    #[test]
    fn test_overlapping_windows_deduplicate() {
        let flights = vec![flight("2014-03-23"), flight("2014-03-24"), flight("2014-03-23")];
        let affected = FlightEffectComparator::affected_days(&flights, 3).unwrap();
        let expected: BTreeSet<String> =
            ["2014-03-23", "2014-03-24", "2014-03-25", "2014-03-26"]
                .iter()
                .map(|s| s.to_string())
                .collect();
        assert_eq!(affected, expected);
    }

    #[test]
    fn test_unparseable_flight_day_errors() {
        let err = FlightEffectComparator::affected_days(&[flight("not-a-date")], 3).unwrap_err();
        assert!(matches!(err, AnalysisError::DateParse(_)));
    }

    #[test]
    fn test_partition_is_exhaustive_and_disjoint() {
        let daily = vec![
            sleep("2014-03-22", 8.0),
            sleep("2014-03-23", 6.0),
            sleep("2014-03-25", 5.5),
            sleep("2014-03-26", 7.9),
        ];
        let affected = FlightEffectComparator::affected_days(&[flight("2014-03-23")], 3).unwrap();
        let (flight_sleeps, baseline_sleeps) =
            FlightEffectComparator::partition(&daily, &affected);

        assert_eq!(flight_sleeps, vec![6.0, 5.5]);
        assert_eq!(baseline_sleeps, vec![8.0, 7.9]);
        assert_eq!(flight_sleeps.len() + baseline_sleeps.len(), daily.len());
    }

    #[test]
    fn test_compare_end_to_end() {
        let daily = vec![
            sleep("2014-03-20", 8.1),
            sleep("2014-03-21", 7.9),
            sleep("2014-03-22", 8.0),
            sleep("2014-03-23", 5.0),
            sleep("2014-03-24", 5.5),
            sleep("2014-03-25", 6.0),
            sleep("2014-03-26", 8.2),
        ];
        let comparison = FlightEffectComparator::compare(
            &[flight("2014-03-23")],
            &daily,
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(comparison.flight_sleeps, vec![5.0, 5.5, 6.0]);
        assert_eq!(comparison.baseline_sleeps, vec![8.1, 7.9, 8.0, 8.2]);
        // Less sleep on flight-affected nights: negative difference
        assert!(comparison.t_test.statistic < 0.0);
        assert!(comparison.t_test.p_value < 0.05);
        assert!(comparison.effect.effect_size < 0.0);
    }

    #[test]
    fn test_zero_flights_is_insufficient_sample() {
        let daily = vec![sleep("2014-03-20", 8.0), sleep("2014-03-21", 7.5)];
        let err = FlightEffectComparator::compare(&[], &daily, &AnalysisConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientSample { actual: 0, .. }
        ));
    }

    #[test]
    fn test_custom_window_length() {
        let affected = FlightEffectComparator::affected_days(&[flight("2014-03-23")], 1).unwrap();
        assert_eq!(affected.len(), 1);
        assert!(affected.contains("2014-03-23"));
    }
}
