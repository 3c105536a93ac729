//! Presentation helpers applied on top of the canonical summary tables.
//!
//! Aggregation always yields key-ordered tables; the reorders, labels and
//! percentage shares a chart needs are derived here.

use super::{HourlyMean, RiderTotals, SummaryError, SummaryRow, SummaryTable, TimelineKey};
use crate::records::{Season, WeatherSituation};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A coded category with a display label.
pub trait Category: Copy {
    fn code(self) -> u8;
    fn label(self) -> &'static str;
}

impl Category for Season {
    fn code(self) -> u8 {
        Season::code(self)
    }

    fn label(self) -> &'static str {
        Season::label(self)
    }
}

impl Category for WeatherSituation {
    fn code(self) -> u8 {
        WeatherSituation::code(self)
    }

    fn label(self) -> &'static str {
        WeatherSituation::label(self)
    }
}

/// A total for one labelled category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledTotal {
    pub code: u8,
    pub label: String,
    pub total: u64,
}

impl LabeledTotal {
    fn from_row<C: Category>(row: &SummaryRow<C, u64>) -> Self {
        LabeledTotal {
            code: row.key.code(),
            label: row.key.label().to_string(),
            total: row.value,
        }
    }
}

/// Rows ordered by total, largest first; ties by ascending key.
pub fn ranked_descending<K: Ord + Copy>(table: &SummaryTable<K, u64>) -> Vec<SummaryRow<K, u64>> {
    let mut rows = table.rows().to_vec();
    rows.sort_by(|a, b| b.value.cmp(&a.value).then(a.key.cmp(&b.key)));
    rows
}

/// Rows ordered by total, smallest first; ties by ascending key.
pub fn ranked_ascending<K: Ord + Copy>(table: &SummaryTable<K, u64>) -> Vec<SummaryRow<K, u64>> {
    let mut rows = table.rows().to_vec();
    rows.sort_by(|a, b| a.value.cmp(&b.value).then(a.key.cmp(&b.key)));
    rows
}

/// Labels every row of a category table, keeping its order.
pub fn labeled<C: Category>(table: &SummaryTable<C, u64>) -> Vec<LabeledTotal> {
    table.rows().iter().map(LabeledTotal::from_row).collect()
}

/// The weather summary in canonical order plus its two bar-chart orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRanking {
    /// Ascending by weather code
    pub totals: Vec<LabeledTotal>,
    pub most_rented: Vec<LabeledTotal>,
    pub least_rented: Vec<LabeledTotal>,
}

impl WeatherRanking {
    pub fn from_table(table: &SummaryTable<WeatherSituation, u64>) -> Self {
        WeatherRanking {
            totals: labeled(table),
            most_rented: ranked_descending(table).iter().map(LabeledTotal::from_row).collect(),
            least_rented: ranked_ascending(table).iter().map(LabeledTotal::from_row).collect(),
        }
    }
}

/// One point of the rentals-over-time chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub weather_code: u8,
    pub weather_label: String,
    pub season_code: u8,
    pub season_label: String,
    pub total: u64,
}

pub fn timeline_points(table: &SummaryTable<TimelineKey, u64>) -> Vec<TimelinePoint> {
    table
        .rows()
        .iter()
        .map(|row| TimelinePoint {
            date: row.key.date,
            weather_code: row.key.weather_situation.code(),
            weather_label: row.key.weather_situation.label().to_string(),
            season_code: row.key.season.code(),
            season_label: row.key.season.label().to_string(),
            total: row.value,
        })
        .collect()
}

/// One point of the hourly-average chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub hour: u8,
    pub mean: f64,
    pub samples: usize,
}

pub fn hourly_points(table: &SummaryTable<u8, HourlyMean>) -> Vec<HourlyPoint> {
    table
        .rows()
        .iter()
        .map(|row| HourlyPoint {
            hour: row.key,
            mean: row.value.mean,
            samples: row.value.samples,
        })
        .collect()
}

/// Percentage split between casual and registered riders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiderShares {
    pub casual_pct: f64,
    pub registered_pct: f64,
}

impl RiderShares {
    /// Computes `part / (casual + registered) * 100` for both parts.
    ///
    /// # Errors
    /// Returns `SummaryError::NoRiders` when both totals are zero.
    pub fn from_totals(totals: &RiderTotals) -> Result<Self, SummaryError> {
        let total = totals.total();
        if total == 0 {
            return Err(SummaryError::NoRiders);
        }

        let total = total as f64;
        Ok(RiderShares {
            casual_pct: totals.casual as f64 / total * 100.0,
            registered_pct: totals.registered as f64 / total * 100.0,
        })
    }

    /// Pie-chart labels with one decimal, e.g. `("18.6%", "81.4%")`.
    pub fn formatted(&self) -> (String, String) {
        (
            format_percentage(self.casual_pct),
            format_percentage(self.registered_pct),
        )
    }
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}
