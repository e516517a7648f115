//! Daily sleep aggregation
//!
//! Collapses raw per-episode sleep records into one total-duration-per-day
//! record. Some days hold several episodes (naps plus the main sleep); the
//! sum is exact in minutes and only the final hours value is rounded.

use std::collections::HashMap;

use crate::stats::round_half_even;
use crate::types::{DailySleepRecord, SleepEpisodeRecord};

const MINUTES_IN_HOUR: f64 = 60.0;

/// Aggregator for per-day sleep totals
pub struct SleepAggregator;

impl SleepAggregator {
    /// Group episodes by calendar day and sum their durations.
    ///
    /// The day key is the leading `date_prefix_len` characters of
    /// `start_time_iso` (`YYYY-MM-DD` for the default 10). Shorter strings
    /// pass through untruncated; grouping is plain string equality, so a
    /// malformed prefix can never collide with a well-formed date. Output
    /// is sorted ascending by day, and days with no episodes do not appear.
    pub fn aggregate(
        episodes: &[SleepEpisodeRecord],
        date_prefix_len: usize,
        decimals: u32,
    ) -> Vec<DailySleepRecord> {
        let mut minutes_by_day: HashMap<String, f64> = HashMap::new();

        for episode in episodes {
            let day = day_prefix(&episode.start_time_iso, date_prefix_len);
            *minutes_by_day.entry(day).or_insert(0.0) += episode.actual_minutes;
        }

        let mut daily: Vec<DailySleepRecord> = minutes_by_day
            .into_iter()
            .map(|(day, minutes)| DailySleepRecord {
                day,
                actual_hours: round_half_even(minutes / MINUTES_IN_HOUR, decimals),
            })
            .collect();

        daily.sort_by(|a, b| a.day.cmp(&b.day));
        daily
    }
}

/// Leading `len` characters of a start string, or the whole string if shorter
pub(crate) fn day_prefix(start: &str, len: usize) -> String {
    // char-boundary-safe; date prefixes are ASCII in practice
    start.chars().take(len).collect()
}
