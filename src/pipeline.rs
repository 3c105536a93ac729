//! Dashboard pipeline
//!
//! Recomputes all five summaries from the immutable dataset and a date range.
//! Nothing is cached between runs: every range change goes through
//! [`DashboardPipeline::run`] again.

use crate::dataset::{RentalDataset, Selection};
use crate::records::{DailyRecord, HourlyRecord, Season, Table, WeatherSituation};
use crate::summary::presentation::{
    hourly_points, labeled, timeline_points, HourlyPoint, LabeledTotal, RiderShares,
    TimelinePoint, WeatherRanking,
};
use crate::summary::{
    summarize_by_hour, summarize_by_season, summarize_by_weather,
    summarize_by_weather_and_season, summarize_casual_vs_registered, HourlyMean, RiderTotals,
    SummaryTable, TimelineKey,
};
use crate::time_series::{DateRange, RangeError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Non-fatal conditions reported alongside a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// The selected range contains no rows of `table`
    EmptySelection { table: Table },
}

impl PipelineWarning {
    /// The warning for `table`, if its selection has no rows.
    pub fn for_rows(table: Table, rows: usize) -> Option<Self> {
        (rows == 0).then_some(PipelineWarning::EmptySelection { table })
    }
}

impl std::fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineWarning::EmptySelection { table } => {
                write!(f, "No {} records in the selected range", table)
            }
        }
    }
}

/// The canonical, key-ordered output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummaries {
    /// Range actually applied, `None` when the request missed the dataset
    pub range: Option<DateRange>,
    pub by_weather: SummaryTable<WeatherSituation, u64>,
    pub by_season: SummaryTable<Season, u64>,
    pub by_weather_and_season: SummaryTable<TimelineKey, u64>,
    pub by_hour: SummaryTable<u8, HourlyMean>,
    pub riders: RiderTotals,
    pub warnings: Vec<PipelineWarning>,
}

impl DashboardSummaries {
    /// Computes every summary from one selection.
    pub fn from_selection(selection: &Selection) -> Self {
        Self::compute(Some(selection.range), &selection.daily, &selection.hourly)
    }

    fn compute(range: Option<DateRange>, daily: &[DailyRecord], hourly: &[HourlyRecord]) -> Self {
        let warnings: Vec<PipelineWarning> = PipelineWarning::for_rows(Table::Daily, daily.len())
            .into_iter()
            .chain(PipelineWarning::for_rows(Table::Hourly, hourly.len()))
            .collect();
        for warning in &warnings {
            warn!("{}", warning);
        }

        DashboardSummaries {
            range,
            by_weather: summarize_by_weather(daily),
            by_season: summarize_by_season(daily),
            by_weather_and_season: summarize_by_weather_and_season(daily),
            by_hour: summarize_by_hour(hourly),
            riders: summarize_casual_vs_registered(daily),
            warnings,
        }
    }

    /// Applies the presentation step to every table.
    pub fn present(&self) -> DashboardView {
        DashboardView {
            range: self.range,
            weather: WeatherRanking::from_table(&self.by_weather),
            season: labeled(&self.by_season),
            timeline: timeline_points(&self.by_weather_and_season),
            hourly: hourly_points(&self.by_hour),
            riders: RidersView::from_totals(self.riders),
            warnings: self.warnings.clone(),
        }
    }
}

/// Rider totals with their percentage split, if one is defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RidersView {
    pub casual: u64,
    pub registered: u64,
    /// `None` when the selection has no riders
    pub shares: Option<RiderShares>,
}

impl RidersView {
    pub fn from_totals(totals: RiderTotals) -> Self {
        RidersView {
            casual: totals.casual,
            registered: totals.registered,
            shares: RiderShares::from_totals(&totals).ok(),
        }
    }
}

/// Chart-ready form of [`DashboardSummaries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub range: Option<DateRange>,
    pub weather: WeatherRanking,
    pub season: Vec<LabeledTotal>,
    pub timeline: Vec<TimelinePoint>,
    pub hourly: Vec<HourlyPoint>,
    pub riders: RidersView,
    pub warnings: Vec<PipelineWarning>,
}

/// Runs the summaries over a shared, read-only dataset.
#[derive(Debug, Clone)]
pub struct DashboardPipeline {
    dataset: Arc<RentalDataset>,
}

impl DashboardPipeline {
    pub fn new(dataset: Arc<RentalDataset>) -> Self {
        DashboardPipeline { dataset }
    }

    pub fn dataset(&self) -> &RentalDataset {
        &self.dataset
    }

    /// Computes all summaries for an explicit range.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if `range.start > range.end`.
    pub fn run(&self, range: &DateRange) -> Result<DashboardSummaries, RangeError> {
        debug!("Running dashboard pipeline for {} to {}", range.start, range.end);
        let selection = self.dataset.select(range)?;
        Ok(DashboardSummaries::from_selection(&selection))
    }

    /// Computes all summaries for a possibly partial request.
    ///
    /// Missing ends default to the dataset bounds and the request is clamped
    /// to them. A request that misses the dataset yields empty summaries
    /// with warnings rather than an error.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if the request is inverted.
    pub fn run_request(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DashboardSummaries, RangeError> {
        match self.select_request(start, end)? {
            Some(selection) => Ok(DashboardSummaries::from_selection(&selection)),
            None => Ok(DashboardSummaries::compute(None, &[], &[])),
        }
    }

    /// Resolves a possibly partial request and selects its rows without
    /// summarizing them. `None` means the request misses the dataset.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if the request is inverted.
    pub fn select_request(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<Selection>, RangeError> {
        match self.dataset.resolve(start, end)? {
            Some(range) => {
                debug!("Selecting {} to {}", range.start, range.end);
                Ok(Some(self.dataset.select(&range)?))
            }
            None => {
                debug!("Requested range does not overlap the dataset");
                Ok(None)
            }
        }
    }
}
