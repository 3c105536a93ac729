use crate::records::Dated;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Date range used to select rental records.
///
/// Both ends are inclusive. A range with `start > end` can be constructed
/// (the fields are public) but every operation that consumes one rejects it
/// with [`RangeError::InvalidRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// Start date (inclusive)
    pub start: NaiveDate,
    /// End date (inclusive)
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new DateRange without validating the order of its ends.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Creates a validated DateRange.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if `start > end`.
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        let range = DateRange { start, end };
        range.validate()?;
        Ok(range)
    }

    /// Creates a DateRange from a standard inclusive range.
    pub fn from_range(range: RangeInclusive<NaiveDate>) -> Self {
        let (start, end) = range.into_inner();
        DateRange { start, end }
    }

    /// Creates a range covering a single day.
    pub fn single_day(date: NaiveDate) -> Self {
        DateRange {
            start: date,
            end: date,
        }
    }

    /// Checks the `start <= end` invariant.
    pub fn validate(&self) -> Result<(), RangeError> {
        if self.start > self.end {
            return Err(RangeError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Whether `date` falls inside the range (inclusive on both ends).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whether `other` lies entirely within this range.
    pub fn covers(&self, other: &DateRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Number of calendar days in the range, 0 for an inverted range.
    pub fn num_days(&self) -> i64 {
        if self.start > self.end {
            0
        } else {
            (self.end - self.start).num_days() + 1
        }
    }

    /// Intersects this range with the dataset bounds.
    ///
    /// Returns `None` when the two ranges do not overlap; that is an empty
    /// selection rather than an error.
    pub fn clamp_to(&self, bounds: &DateRange) -> Option<DateRange> {
        let start = self.start.max(bounds.start);
        let end = self.end.min(bounds.end);
        if start > end {
            None
        } else {
            Some(DateRange { start, end })
        }
    }
}

/// Errors produced when a date range is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// The range ends before it starts
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

impl std::fmt::Display for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeError::InvalidRange { start, end } => {
                write!(f, "Invalid date range: end {} is before start {}", end, start)
            }
        }
    }
}

impl std::error::Error for RangeError {}

/// Selects the records whose date lies in `range`, keeping their order.
///
/// # Errors
/// Returns `RangeError::InvalidRange` if `range.start > range.end`.
pub fn filter_by_date<T>(records: &[T], range: &DateRange) -> Result<Vec<T>, RangeError>
where
    T: Dated + Clone,
{
    range.validate()?;

    Ok(records
        .iter()
        .filter(|record| range.contains(record.date()))
        .cloned()
        .collect())
}

/// Returns the smallest range covering every record, or `None` if empty.
pub fn date_bounds<T: Dated>(records: &[T]) -> Option<DateRange> {
    let mut dates = records.iter().map(Dated::date);
    let first = dates.next()?;
    let (start, end) = dates.fold((first, first), |(lo, hi), date| (lo.min(date), hi.max(date)));
    Some(DateRange { start, end })
}

/// Turns an optional start/end request into the range to query.
///
/// Missing ends default to the matching dataset bound. Only a request that
/// names both ends can be inverted; it is rejected before clamping. The
/// result is the request intersected with `bounds`, or `None` if the two do
/// not overlap (a lone `start` after the data, or a lone `end` before it).
///
/// # Errors
/// Returns `RangeError::InvalidRange` if both ends are given and `start > end`.
pub fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    bounds: &DateRange,
) -> Result<Option<DateRange>, RangeError> {
    if let (Some(start), Some(end)) = (start, end) {
        DateRange::try_new(start, end)?;
    }

    let requested = DateRange::new(start.unwrap_or(bounds.start), end.unwrap_or(bounds.end));
    Ok(requested.clamp_to(bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::HourlyRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_records() -> Vec<HourlyRecord> {
        vec![
            HourlyRecord::new(date(2011, 1, 3), 0, 30),
            HourlyRecord::new(date(2011, 1, 1), 0, 10),
            HourlyRecord::new(date(2011, 1, 2), 5, 20),
            HourlyRecord::new(date(2011, 1, 4), 9, 40),
            HourlyRecord::new(date(2011, 1, 2), 6, 25),
        ]
    }

    #[test]
    fn test_try_new_rejects_inverted_range() {
        let result = DateRange::try_new(date(2011, 1, 2), date(2011, 1, 1));
        assert_eq!(
            result.unwrap_err(),
            RangeError::InvalidRange {
                start: date(2011, 1, 2),
                end: date(2011, 1, 1),
            }
        );
        assert!(DateRange::try_new(date(2011, 1, 1), date(2011, 1, 1)).is_ok());
    }

    #[test]
    fn test_filter_keeps_inclusive_bounds_and_order() {
        let records = sample_records();
        let range = DateRange::new(date(2011, 1, 2), date(2011, 1, 3));

        let filtered = filter_by_date(&records, &range).unwrap();
        let totals: Vec<u64> = filtered.iter().map(|r| r.total_count).collect();
        assert_eq!(totals, vec![30, 20, 25]);
    }

    #[test]
    fn test_filter_with_full_bounds_is_identity() {
        let records = sample_records();
        let bounds = date_bounds(&records).unwrap();
        assert_eq!(filter_by_date(&records, &bounds).unwrap(), records);
    }

    #[test]
    fn test_filter_is_idempotent_under_superset_range() {
        let records = sample_records();
        let narrow = DateRange::new(date(2011, 1, 2), date(2011, 1, 2));
        let wide = DateRange::new(date(2010, 12, 1), date(2011, 2, 1));

        let once = filter_by_date(&records, &narrow).unwrap();
        let twice = filter_by_date(&once, &wide).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_rejects_inverted_range() {
        let records = sample_records();
        let inverted = DateRange::new(date(2011, 1, 4), date(2011, 1, 1));
        assert!(matches!(
            filter_by_date(&records, &inverted),
            Err(RangeError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_date_bounds() {
        let bounds = date_bounds(&sample_records()).unwrap();
        assert_eq!(bounds, DateRange::new(date(2011, 1, 1), date(2011, 1, 4)));
        assert_eq!(bounds.num_days(), 4);
        assert!(date_bounds::<HourlyRecord>(&[]).is_none());
    }

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = DateRange::new(date(2011, 1, 1), date(2012, 12, 31));

        let wide = DateRange::new(date(2010, 6, 1), date(2013, 1, 1));
        assert_eq!(wide.clamp_to(&bounds), Some(bounds));

        let partial = DateRange::new(date(2012, 12, 1), date(2013, 3, 1));
        assert_eq!(
            partial.clamp_to(&bounds),
            Some(DateRange::new(date(2012, 12, 1), date(2012, 12, 31)))
        );

        let outside = DateRange::new(date(2013, 1, 1), date(2013, 2, 1));
        assert_eq!(outside.clamp_to(&bounds), None);
    }

    #[test]
    fn test_resolve_range_defaults_to_bounds() {
        let bounds = DateRange::new(date(2011, 1, 1), date(2012, 12, 31));

        assert_eq!(resolve_range(None, None, &bounds).unwrap(), Some(bounds));
        assert_eq!(
            resolve_range(Some(date(2012, 1, 1)), None, &bounds).unwrap(),
            Some(DateRange::new(date(2012, 1, 1), date(2012, 12, 31)))
        );
    }

    #[test]
    fn test_resolve_range_rejects_inversion_before_clamping() {
        let bounds = DateRange::new(date(2011, 1, 1), date(2012, 12, 31));
        let result = resolve_range(Some(date(2014, 1, 1)), Some(date(2013, 1, 1)), &bounds);
        assert!(matches!(result, Err(RangeError::InvalidRange { .. })));
    }

    #[test]
    fn test_resolve_range_single_end_outside_bounds_is_empty() {
        let bounds = DateRange::new(date(2011, 1, 1), date(2012, 12, 31));

        assert_eq!(resolve_range(Some(date(2015, 1, 1)), None, &bounds).unwrap(), None);
        assert_eq!(resolve_range(None, Some(date(2010, 1, 1)), &bounds).unwrap(), None);
        assert_eq!(
            resolve_range(None, Some(date(2011, 1, 1)), &bounds).unwrap(),
            Some(DateRange::single_day(date(2011, 1, 1)))
        );
    }

    #[test]
    fn test_covers_and_contains() {
        let outer = DateRange::new(date(2011, 1, 1), date(2011, 1, 31));
        let inner = DateRange::single_day(date(2011, 1, 15));
        assert!(outer.covers(&inner));
        assert!(!inner.covers(&outer));
        assert!(outer.contains(date(2011, 1, 31)));
        assert!(!outer.contains(date(2011, 2, 1)));
        assert_eq!(DateRange::from_range(date(2011, 1, 1)..=date(2011, 1, 31)), outer);
    }
}
