//! Summary Tables
//!
//! The five aggregations behind the rental dashboard. Each function is pure:
//! it takes an already-filtered record slice and returns a fresh table sorted
//! by key. Presentation concerns (ranking, labels, percentages) live in
//! [`presentation`].

pub mod grouping;
pub mod presentation;

use crate::records::{DailyRecord, HourlyRecord, Season, WeatherSituation, HOURS_PER_DAY};
use chrono::NaiveDate;
use grouping::{group_stats, group_sum};
use serde::{Deserialize, Serialize};

/// One key/aggregate pair of a summary table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow<K, V> {
    pub key: K,
    pub value: V,
}

/// A derived mapping from a categorical key to an aggregate, sorted by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable<K, V> {
    rows: Vec<SummaryRow<K, V>>,
}

impl<K, V> SummaryTable<K, V> {
    fn from_pairs(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        SummaryTable {
            rows: pairs
                .into_iter()
                .map(|(key, value)| SummaryRow { key, value })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[SummaryRow<K, V>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.rows.iter().map(|row| &row.key)
    }
}

impl<K: PartialEq, V> SummaryTable<K, V> {
    /// Looks up the aggregate for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.rows.iter().find(|row| &row.key == key).map(|row| &row.value)
    }
}

impl<K> SummaryTable<K, u64> {
    /// Sum of every aggregate in the table.
    pub fn grand_total(&self) -> u64 {
        self.rows.iter().map(|row| row.value).sum()
    }
}

/// Grouping key of the rentals-over-time table.
///
/// Field order defines the sort: date first, then weather, then season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimelineKey {
    pub date: NaiveDate,
    pub weather_situation: WeatherSituation,
    pub season: Season,
}

/// Mean rentals for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyMean {
    /// Arithmetic mean of `total_count`; `0.0` when `samples == 0`
    pub mean: f64,
    /// Number of hourly rows that contributed
    pub samples: usize,
}

/// Casual and registered rider totals over a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiderTotals {
    pub casual: u64,
    pub registered: u64,
}

impl RiderTotals {
    pub fn total(&self) -> u64 {
        self.casual + self.registered
    }
}

/// Errors raised when a summary cannot be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    /// Percentage shares were requested for a selection with no riders
    NoRiders,
}

impl std::fmt::Display for SummaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryError::NoRiders => {
                write!(f, "No riders in selection: percentage shares are undefined")
            }
        }
    }
}

impl std::error::Error for SummaryError {}

/// Total rentals per weather situation, ascending by weather code.
///
/// Only weather codes present in `records` appear.
pub fn summarize_by_weather(records: &[DailyRecord]) -> SummaryTable<WeatherSituation, u64> {
    SummaryTable::from_pairs(group_sum(
        records,
        |r| r.weather_situation,
        |r| r.total_count,
    ))
}

/// Total rentals per season, ascending by season code.
pub fn summarize_by_season(records: &[DailyRecord]) -> SummaryTable<Season, u64> {
    SummaryTable::from_pairs(group_sum(records, |r| r.season, |r| r.total_count))
}

/// Total rentals per (date, weather, season), ascending by date.
///
/// Weather and season are per-day attributes, so in practice this yields
/// one row per date.
pub fn summarize_by_weather_and_season(records: &[DailyRecord]) -> SummaryTable<TimelineKey, u64> {
    SummaryTable::from_pairs(group_sum(
        records,
        |r| TimelineKey {
            date: r.date,
            weather_situation: r.weather_situation,
            season: r.season,
        },
        |r| r.total_count,
    ))
}

/// Mean rentals per hour of day over the given hourly rows.
///
/// Always returns 24 rows (hours 0-23). An hour without rows reports a mean
/// of `0.0` and `samples == 0`.
pub fn summarize_by_hour(records: &[HourlyRecord]) -> SummaryTable<u8, HourlyMean> {
    let stats = group_stats(records, |r| r.hour, |r| r.total_count);

    SummaryTable::from_pairs((0..HOURS_PER_DAY).map(|hour| {
        let group = stats.get(&hour).copied().unwrap_or_default();
        let mean = HourlyMean {
            mean: group.mean().unwrap_or(0.0),
            samples: group.count,
        };
        (hour, mean)
    }))
}

/// Sums casual and registered riders over the given daily rows.
pub fn summarize_casual_vs_registered(records: &[DailyRecord]) -> RiderTotals {
    records.iter().fold(RiderTotals::default(), |acc, r| RiderTotals {
        casual: acc.casual + r.casual_count,
        registered: acc.registered + r.registered_count,
    })
}
