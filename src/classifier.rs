//! Flight classification
//!
//! Labels on wearable activity data are noisy: genuine flights show up as
//! either "airplane" or the ambiguous "transport" (which also covers cars
//! and trains). "airplane" is trusted outright; "transport" is kept only
//! when the average speed falls inside the flight corridor. A duration
//! floor then drops very short events from the combined set.

use crate::aggregator::day_prefix;
use crate::config::AnalysisConfig;
use crate::stats::round_half_even;
use crate::types::{ActivityRecord, FlightRecord};

const SECONDS_IN_HOUR: f64 = 3600.0;

/// Label trusted unconditionally as a flight
pub const AIRPLANE_LABEL: &str = "airplane";

/// Ambiguous label disambiguated by the speed corridor
pub const TRANSPORT_LABEL: &str = "transport";

/// Classifier for extracting flights from activity data
pub struct FlightClassifier;

impl FlightClassifier {
    /// Extract flight records from raw activities.
    ///
    /// Union of two branches: label == "airplane", or label == "transport"
    /// with average speed strictly inside the configured corridor. The
    /// duration floor applies to the combined set, and the output is sorted
    /// ascending by day. A non-positive duration makes speed undefined;
    /// such records are treated as not-a-flight, never an error.
    pub fn classify(activities: &[ActivityRecord], config: &AnalysisConfig) -> Vec<FlightRecord> {
        let mut flights: Vec<FlightRecord> = activities
            .iter()
            .filter(|activity| is_flight(activity, config))
            .map(|activity| FlightRecord {
                day: day_prefix(&activity.start, config.date_prefix_len),
                duration_hours: round_half_even(
                    activity.duration_seconds / SECONDS_IN_HOUR,
                    config.decimals,
                ),
            })
            .collect();

        flights.sort_by(|a, b| a.day.cmp(&b.day));
        flights
    }
}

fn is_flight(activity: &ActivityRecord, config: &AnalysisConfig) -> bool {
    let duration_hours = activity.duration_seconds / SECONDS_IN_HOUR;
    if duration_hours <= config.min_flight_duration_hours {
        return false;
    }

    if activity.activity_label == AIRPLANE_LABEL {
        return true;
    }

    if activity.activity_label == TRANSPORT_LABEL {
        if let Some(speed) = average_speed_mph(activity) {
            return speed > config.min_flight_speed_mph && speed < config.max_flight_speed_mph;
        }
    }

    false
}

/// Average speed in mph, or `None` when the duration is non-positive
fn average_speed_mph(activity: &ActivityRecord) -> Option<f64> {
    let duration_hours = activity.duration_seconds / SECONDS_IN_HOUR;
    if duration_hours <= 0.0 {
        return None;
    }
    Some(activity.distance_miles / duration_hours)
}
