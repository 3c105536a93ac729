use crate::loader::{self, LoadError};
use crate::records::{DailyRecord, HourlyRecord};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Trait for rental data source abstraction.
///
/// The pipeline only ever sees validated records, so any tabular source
/// that satisfies the daily/hourly schema can feed it.
///
/// Implementations can be:
/// - In-memory vectors (for testing)
/// - CSV files on disk
/// - SQLite database
/// - CSV text fetched over HTTP (see [`crate::download`])
pub trait RentalSource {
    /// Reads every daily record, in source order.
    ///
    /// # Errors
    /// Returns an error if the source cannot be read or a row is malformed.
    fn daily_records(&self) -> Result<Vec<DailyRecord>, SourceError>;

    /// Reads every hourly record, in source order.
    ///
    /// # Errors
    /// Returns an error if the source cannot be read or a row is malformed.
    fn hourly_records(&self) -> Result<Vec<HourlyRecord>, SourceError>;
}

/// Errors that can occur when reading from a rental source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// A file could not be opened
    Io { path: PathBuf, message: String },
    /// The raw data was malformed
    Load(LoadError),
    /// Database access failed
    Database(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Io { path, message } => {
                write!(f, "Failed to open {}: {}", path.display(), message)
            }
            SourceError::Load(err) => write!(f, "{}", err),
            SourceError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<LoadError> for SourceError {
    fn from(err: LoadError) -> Self {
        SourceError::Load(err)
    }
}

impl From<rusqlite::Error> for SourceError {
    fn from(err: rusqlite::Error) -> Self {
        SourceError::Database(err.to_string())
    }
}

/// In-memory source for tests and for CSV text already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    daily: Vec<DailyRecord>,
    hourly: Vec<HourlyRecord>,
}

impl InMemorySource {
    /// Creates a source over already-validated records.
    pub fn new(daily: Vec<DailyRecord>, hourly: Vec<HourlyRecord>) -> Self {
        InMemorySource { daily, hourly }
    }

    /// Parses CSV text for both tables.
    ///
    /// # Errors
    /// Returns `LoadError` if either table is malformed.
    pub fn from_csv_text(daily_csv: &str, hourly_csv: &str) -> Result<Self, LoadError> {
        let (daily, hourly) = loader::load(daily_csv.as_bytes(), hourly_csv.as_bytes())?;
        Ok(InMemorySource { daily, hourly })
    }
}

impl RentalSource for InMemorySource {
    fn daily_records(&self) -> Result<Vec<DailyRecord>, SourceError> {
        Ok(self.daily.clone())
    }

    fn hourly_records(&self) -> Result<Vec<HourlyRecord>, SourceError> {
        Ok(self.hourly.clone())
    }
}

/// Reads the two tables from CSV files (`day.csv` / `hour.csv` layout).
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    daily_path: PathBuf,
    hourly_path: PathBuf,
}

impl CsvFileSource {
    pub fn new(daily_path: impl Into<PathBuf>, hourly_path: impl Into<PathBuf>) -> Self {
        CsvFileSource {
            daily_path: daily_path.into(),
            hourly_path: hourly_path.into(),
        }
    }

    fn open(path: &Path) -> Result<File, SourceError> {
        File::open(path).map_err(|e| SourceError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl RentalSource for CsvFileSource {
    fn daily_records(&self) -> Result<Vec<DailyRecord>, SourceError> {
        log::info!("Reading daily records from {}", self.daily_path.display());
        let file = Self::open(&self.daily_path)?;
        Ok(loader::parse_daily(file)?)
    }

    fn hourly_records(&self) -> Result<Vec<HourlyRecord>, SourceError> {
        log::info!("Reading hourly records from {}", self.hourly_path.display());
        let file = Self::open(&self.hourly_path)?;
        Ok(loader::parse_hourly(file)?)
    }
}
