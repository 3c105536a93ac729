use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of hour-of-day buckets in the hourly dataset.
pub const HOURS_PER_DAY: u8 = 24;

/// Checks an hour-of-day code (0-23).
///
/// # Errors
/// Returns `CodeError` if `code` is 24 or more.
pub fn hour_from_code(code: u8) -> Result<u8, CodeError> {
    if code < HOURS_PER_DAY {
        Ok(code)
    } else {
        Err(CodeError::new("hour", code))
    }
}

/// Anything that is keyed by a calendar date and can be range-filtered.
pub trait Dated {
    /// The calendar date this record belongs to.
    fn date(&self) -> NaiveDate;
}

/// Meteorological season as coded in the rental datasets (1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// All seasons in ascending code order.
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Resolves a dataset code into a season.
    ///
    /// # Errors
    /// Returns `CodeError` if `code` is outside 1-4.
    pub fn from_code(code: u8) -> Result<Self, CodeError> {
        match code {
            1 => Ok(Season::Spring),
            2 => Ok(Season::Summer),
            3 => Ok(Season::Fall),
            4 => Ok(Season::Winter),
            other => Err(CodeError::new("season", other)),
        }
    }

    /// The dataset code (1-4).
    pub fn code(self) -> u8 {
        match self {
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Fall => 3,
            Season::Winter => 4,
        }
    }

    /// Display label used by the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl From<Season> for u8 {
    fn from(season: Season) -> u8 {
        season.code()
    }
}

impl TryFrom<u8> for Season {
    type Error = CodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Season::from_code(code)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Weather situation as coded in the rental datasets (1-4).
///
/// 1 is clear or partly cloudy, 4 is heavy rain, snow or fog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WeatherSituation {
    Clear,
    Misty,
    LightPrecipitation,
    HeavyPrecipitation,
}

impl WeatherSituation {
    /// All weather situations in ascending code order.
    pub const ALL: [WeatherSituation; 4] = [
        WeatherSituation::Clear,
        WeatherSituation::Misty,
        WeatherSituation::LightPrecipitation,
        WeatherSituation::HeavyPrecipitation,
    ];

    /// Resolves a dataset code into a weather situation.
    ///
    /// # Errors
    /// Returns `CodeError` if `code` is outside 1-4.
    pub fn from_code(code: u8) -> Result<Self, CodeError> {
        match code {
            1 => Ok(WeatherSituation::Clear),
            2 => Ok(WeatherSituation::Misty),
            3 => Ok(WeatherSituation::LightPrecipitation),
            4 => Ok(WeatherSituation::HeavyPrecipitation),
            other => Err(CodeError::new("weather situation", other)),
        }
    }

    /// The dataset code (1-4).
    pub fn code(self) -> u8 {
        match self {
            WeatherSituation::Clear => 1,
            WeatherSituation::Misty => 2,
            WeatherSituation::LightPrecipitation => 3,
            WeatherSituation::HeavyPrecipitation => 4,
        }
    }

    /// Display label used by the dashboard legend.
    pub fn label(self) -> &'static str {
        match self {
            WeatherSituation::Clear => "Clear",
            WeatherSituation::Misty => "Misty",
            WeatherSituation::LightPrecipitation => "Light Rain/Snow",
            WeatherSituation::HeavyPrecipitation => "Heavy Rain/Snow",
        }
    }
}

impl From<WeatherSituation> for u8 {
    fn from(weather: WeatherSituation) -> u8 {
        weather.code()
    }
}

impl TryFrom<u8> for WeatherSituation {
    type Error = CodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        WeatherSituation::from_code(code)
    }
}

impl fmt::Display for WeatherSituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A categorical code outside its documented domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeError {
    /// Which categorical field was being decoded
    pub kind: &'static str,
    /// The rejected code
    pub code: u8,
}

impl CodeError {
    fn new(kind: &'static str, code: u8) -> Self {
        CodeError { kind, code }
    }
}

impl fmt::Display for CodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} code: {}", self.kind, self.code)
    }
}

impl std::error::Error for CodeError {}

/// The two raw tables a rental dataset is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Daily,
    Hourly,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Daily => write!(f, "daily"),
            Table::Hourly => write!(f, "hourly"),
        }
    }
}

/// One row of the daily dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub season: Season,
    pub weather_situation: WeatherSituation,
    pub casual_count: u64,
    pub registered_count: u64,
    /// Always `casual_count + registered_count` for loaded records.
    pub total_count: u64,
}

impl DailyRecord {
    /// Creates a daily record whose total is derived from the two rider counts.
    ///
    /// The total saturates at `u64::MAX`; such a record fails
    /// [`is_consistent`](Self::is_consistent).
    pub fn new(
        date: NaiveDate,
        season: Season,
        weather_situation: WeatherSituation,
        casual_count: u64,
        registered_count: u64,
    ) -> Self {
        DailyRecord {
            date,
            season,
            weather_situation,
            casual_count,
            registered_count,
            total_count: casual_count.saturating_add(registered_count),
        }
    }

    /// Whether the stored total matches the rider breakdown.
    pub fn is_consistent(&self) -> bool {
        self.casual_count.checked_add(self.registered_count) == Some(self.total_count)
    }
}

impl Dated for DailyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// One row of the hourly dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    /// Hour of day, 0-23.
    pub hour: u8,
    pub total_count: u64,
}

impl HourlyRecord {
    pub fn new(date: NaiveDate, hour: u8, total_count: u64) -> Self {
        HourlyRecord {
            date,
            hour,
            total_count,
        }
    }
}

impl Dated for HourlyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_codes_round_trip_through_labels() {
        let labels: Vec<&str> = Season::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["Spring", "Summer", "Fall", "Winter"]);
        for season in Season::ALL {
            assert_eq!(Season::from_code(season.code()).unwrap(), season);
        }
    }

    #[test]
    fn test_season_rejects_out_of_range_codes() {
        let err = Season::from_code(0).unwrap_err();
        assert_eq!(err.kind, "season");
        assert_eq!(err.to_string(), "invalid season code: 0");
        assert!(Season::from_code(5).is_err());
    }

    #[test]
    fn test_weather_labels_match_dashboard_legend() {
        assert_eq!(WeatherSituation::from_code(1).unwrap().label(), "Clear");
        assert_eq!(WeatherSituation::from_code(2).unwrap().label(), "Misty");
        assert_eq!(WeatherSituation::from_code(3).unwrap().label(), "Light Rain/Snow");
        assert_eq!(WeatherSituation::from_code(4).unwrap().label(), "Heavy Rain/Snow");
        assert!(WeatherSituation::from_code(9).is_err());
    }

    #[test]
    fn test_codes_serialize_as_integers() {
        let json = serde_json::to_string(&WeatherSituation::Misty).unwrap();
        assert_eq!(json, "2");
        let season: Season = serde_json::from_str("3").unwrap();
        assert_eq!(season, Season::Fall);
        assert!(serde_json::from_str::<Season>("7").is_err());
    }

    #[test]
    fn test_daily_record_total_is_derived() {
        let date = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        let record = DailyRecord::new(date, Season::Spring, WeatherSituation::Clear, 10, 90);
        assert_eq!(record.total_count, 100);
        assert!(record.is_consistent());

        let broken = DailyRecord {
            total_count: 99,
            ..record
        };
        assert!(!broken.is_consistent());
    }

    #[test]
    fn test_daily_record_total_saturates() {
        let date = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        let record = DailyRecord::new(date, Season::Spring, WeatherSituation::Clear, u64::MAX, 1);
        assert_eq!(record.total_count, u64::MAX);
        assert!(!record.is_consistent());
    }

    #[test]
    fn test_hour_from_code() {
        assert_eq!(hour_from_code(0), Ok(0));
        assert_eq!(hour_from_code(23), Ok(23));
        assert_eq!(
            hour_from_code(24).unwrap_err().to_string(),
            "invalid hour code: 24"
        );
    }

    #[test]
    fn test_records_expose_their_date() {
        let date = NaiveDate::from_ymd_opt(2012, 6, 30).unwrap();
        let hourly = HourlyRecord::new(date, 17, 512);
        assert_eq!(Dated::date(&hourly), date);
    }
}
