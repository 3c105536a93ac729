use crate::loader::{self, LoadError};
use crate::records::{DailyRecord, HourlyRecord};
use crate::source::{RentalSource, SourceError};
use crate::time_series::{date_bounds, filter_by_date, resolve_range, DateRange, RangeError};
use chrono::NaiveDate;
use std::io::Read;

/// The immutable pair of rental tables, loaded once per process.
///
/// Every summary is derived from a [`Selection`] of this dataset; nothing
/// here is ever mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalDataset {
    daily: Vec<DailyRecord>,
    hourly: Vec<HourlyRecord>,
    bounds: Option<DateRange>,
}

impl RentalDataset {
    /// Wraps already-validated records.
    pub fn new(daily: Vec<DailyRecord>, hourly: Vec<HourlyRecord>) -> Self {
        let bounds = date_bounds(&daily);
        RentalDataset {
            daily,
            hourly,
            bounds,
        }
    }

    /// Parses the two raw CSV tables.
    pub fn from_csv<D: Read, H: Read>(daily: D, hourly: H) -> Result<Self, LoadError> {
        let (daily, hourly) = loader::load(daily, hourly)?;
        Ok(Self::new(daily, hourly))
    }

    /// Reads both tables from any rental source.
    pub fn from_source<S: RentalSource + ?Sized>(source: &S) -> Result<Self, SourceError> {
        let daily = source.daily_records()?;
        let hourly = source.hourly_records()?;
        log::info!(
            "Loaded {} daily and {} hourly records",
            daily.len(),
            hourly.len()
        );
        Ok(Self::new(daily, hourly))
    }

    pub fn daily(&self) -> &[DailyRecord] {
        &self.daily
    }

    pub fn hourly(&self) -> &[HourlyRecord] {
        &self.hourly
    }

    /// Min/max date of the daily table, `None` when it is empty.
    pub fn bounds(&self) -> Option<DateRange> {
        self.bounds
    }

    /// Turns an optional start/end request into the range to select.
    ///
    /// Missing ends default to the dataset bounds and the request is clamped
    /// to them. `Ok(None)` means the request does not overlap the data.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if the request is inverted.
    pub fn resolve(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<DateRange>, RangeError> {
        match self.bounds {
            Some(bounds) => resolve_range(start, end, &bounds),
            None => {
                if let (Some(start), Some(end)) = (start, end) {
                    DateRange::try_new(start, end)?;
                }
                Ok(None)
            }
        }
    }

    /// Filters both tables with the same range.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if `range.start > range.end`.
    pub fn select(&self, range: &DateRange) -> Result<Selection, RangeError> {
        Ok(Selection {
            range: *range,
            daily: filter_by_date(&self.daily, range)?,
            hourly: filter_by_date(&self.hourly, range)?,
        })
    }
}

/// The records of a dataset that fall inside one date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub range: DateRange,
    pub daily: Vec<DailyRecord>,
    pub hourly: Vec<HourlyRecord>,
}

impl Selection {
    /// Sum of `total_count` over the selected daily rows.
    pub fn grand_total(&self) -> u64 {
        self.daily.iter().map(|r| r.total_count).sum()
    }
}
