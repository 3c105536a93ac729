//! Where the two rental tables are read from at startup.
//!
//! Locations come from environment variables in both binaries:
//! `DAILY_CSV` / `HOURLY_CSV` (URL or file path) and `DATABASE_PATH`.

use crate::dataset::RentalDataset;
use crate::download::{DatasetDownloader, DEFAULT_DAILY_URL, DEFAULT_HOURLY_URL};
use crate::sqlite_source::SqliteSource;
use std::path::PathBuf;

/// Location of one CSV table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLocation {
    Url(String),
    File(PathBuf),
}

impl TableLocation {
    /// Values starting with `http://` or `https://` are URLs, anything else a path.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            TableLocation::Url(value.to_string())
        } else {
            TableLocation::File(PathBuf::from(value))
        }
    }

    async fn read_text(
        &self,
        downloader: &mut Option<DatasetDownloader>,
    ) -> Result<String, Box<dyn std::error::Error>> {
        match self {
            TableLocation::Url(url) => {
                if downloader.is_none() {
                    *downloader = Some(DatasetDownloader::new()?);
                }
                let client = downloader.as_ref().ok_or("downloader unavailable")?;
                Ok(client.fetch_csv(url).await?)
            }
            TableLocation::File(path) => {
                log::info!("Reading {}", path.display());
                Ok(std::fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?)
            }
        }
    }
}

/// Where the dataset is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    /// Two CSV tables, each fetched or read independently
    Csv {
        daily: TableLocation,
        hourly: TableLocation,
    },
    /// A SQLite database previously filled with [`SqliteSource::import`]
    Sqlite(PathBuf),
}

impl Default for DatasetLocation {
    fn default() -> Self {
        DatasetLocation::Csv {
            daily: TableLocation::Url(DEFAULT_DAILY_URL.to_string()),
            hourly: TableLocation::Url(DEFAULT_HOURLY_URL.to_string()),
        }
    }
}

impl DatasetLocation {
    /// Resolves the location from optional configuration values.
    ///
    /// CSV locations win over a database path; a missing CSV location falls
    /// back to the published URL for that table.
    pub fn from_values(
        daily_csv: Option<String>,
        hourly_csv: Option<String>,
        database_path: Option<String>,
    ) -> Self {
        match (daily_csv, hourly_csv, database_path) {
            (None, None, Some(path)) => DatasetLocation::Sqlite(PathBuf::from(path)),
            (daily, hourly, _) => DatasetLocation::Csv {
                daily: daily
                    .map(|v| TableLocation::parse(&v))
                    .unwrap_or_else(|| TableLocation::Url(DEFAULT_DAILY_URL.to_string())),
                hourly: hourly
                    .map(|v| TableLocation::parse(&v))
                    .unwrap_or_else(|| TableLocation::Url(DEFAULT_HOURLY_URL.to_string())),
            },
        }
    }

    /// Reads `DAILY_CSV`, `HOURLY_CSV` and `DATABASE_PATH`.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self::from_values(var("DAILY_CSV"), var("HOURLY_CSV"), var("DATABASE_PATH"))
    }

    /// Loads and validates the dataset. Called once at startup.
    pub async fn load(&self) -> Result<RentalDataset, Box<dyn std::error::Error>> {
        match self {
            DatasetLocation::Csv { daily, hourly } => {
                let mut downloader = None;
                let daily_text = daily.read_text(&mut downloader).await?;
                let hourly_text = hourly.read_text(&mut downloader).await?;
                Ok(RentalDataset::from_csv(
                    daily_text.as_bytes(),
                    hourly_text.as_bytes(),
                )?)
            }
            DatasetLocation::Sqlite(path) => {
                log::info!("Reading rental tables from {}", path.display());
                let source = SqliteSource::new(path)?;
                Ok(RentalDataset::from_source(&source)?)
            }
        }
    }
}

impl std::fmt::Display for TableLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableLocation::Url(url) => write!(f, "{}", url),
            TableLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl std::fmt::Display for DatasetLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetLocation::Csv { daily, hourly } => write!(f, "daily={}, hourly={}", daily, hourly),
            DatasetLocation::Sqlite(path) => write!(f, "sqlite={}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{DailyRecord, HourlyRecord, Season, WeatherSituation};
    use chrono::NaiveDate;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bikeshare-location-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_table_location_parse() {
        assert_eq!(
            TableLocation::parse("https://example.com/day.csv"),
            TableLocation::Url("https://example.com/day.csv".to_string())
        );
        assert_eq!(
            TableLocation::parse(" data/day.csv "),
            TableLocation::File(PathBuf::from("data/day.csv"))
        );
    }

    #[test]
    fn test_from_values_precedence() {
        assert_eq!(DatasetLocation::from_values(None, None, None), DatasetLocation::default());
        assert_eq!(
            DatasetLocation::from_values(None, None, Some("rentals.db".to_string())),
            DatasetLocation::Sqlite(PathBuf::from("rentals.db"))
        );

        let location = DatasetLocation::from_values(
            Some("day.csv".to_string()),
            None,
            Some("rentals.db".to_string()),
        );
        assert_eq!(
            location,
            DatasetLocation::Csv {
                daily: TableLocation::File(PathBuf::from("day.csv")),
                hourly: TableLocation::Url(DEFAULT_HOURLY_URL.to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_load_from_files() {
        let daily = temp_path("day.csv");
        let hourly = temp_path("hour.csv");
        std::fs::write(&daily, "dteday,season,weathersit,casual,registered,cnt\n2011-01-01,1,1,10,90,100\n").unwrap();
        std::fs::write(&hourly, "dteday,hr,cnt\n2011-01-01,0,100\n").unwrap();

        let location = DatasetLocation::Csv {
            daily: TableLocation::File(daily.clone()),
            hourly: TableLocation::File(hourly.clone()),
        };
        let dataset = location.load().await.unwrap();

        std::fs::remove_file(&daily).ok();
        std::fs::remove_file(&hourly).ok();
        assert_eq!(dataset.daily().len(), 1);
    }

    #[tokio::test]
    async fn test_load_from_sqlite() {
        let path = temp_path("rentals.db");
        std::fs::remove_file(&path).ok();
        let date = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        {
            let mut source = SqliteSource::new(&path).unwrap();
            source
                .import(
                    &[DailyRecord::new(date, Season::Spring, WeatherSituation::Clear, 1, 2)],
                    &[HourlyRecord::new(date, 0, 3)],
                )
                .unwrap();
        }

        let dataset = DatasetLocation::Sqlite(path.clone()).load().await.unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(dataset.daily()[0].total_count, 3);
        assert_eq!(dataset.hourly().len(), 1);
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let location = DatasetLocation::Csv {
            daily: TableLocation::File(temp_path("absent-day.csv")),
            hourly: TableLocation::File(temp_path("absent-hour.csv")),
        };
        let err = location.load().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
