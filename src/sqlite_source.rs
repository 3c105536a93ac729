use crate::loader::LoadError;
use crate::records::{hour_from_code, DailyRecord, HourlyRecord, Season, Table, WeatherSituation};
use crate::source::{RentalSource, SourceError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::path::Path;

/// SQLite-backed rental source.
///
/// Holds the daily and hourly tables so a downloaded dataset can be cached
/// locally. Dates are stored as ISO 8601 text and validated on read exactly
/// like CSV input. Automatically creates schema on first use.
#[derive(Debug)]
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Opens (or creates) a file-based database.
    ///
    /// # Errors
    /// Returns an error if the database connection cannot be established.
    pub fn new<P: AsRef<Path>>(db_path: P) -> SqliteResult<Self> {
        let conn = Connection::open(db_path)?;
        let source = SqliteSource { conn };
        source.ensure_schema()?;
        Ok(source)
    }

    /// Creates a new in-memory database. Useful for testing.
    pub fn new_in_memory() -> SqliteResult<Self> {
        let conn = Connection::open_in_memory()?;
        let source = SqliteSource { conn };
        source.ensure_schema()?;
        Ok(source)
    }

    fn ensure_schema(&self) -> SqliteResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS daily_records (
                dteday TEXT PRIMARY KEY,
                season INTEGER NOT NULL,
                weathersit INTEGER NOT NULL,
                casual INTEGER NOT NULL,
                registered INTEGER NOT NULL,
                cnt INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS hourly_records (
                dteday TEXT NOT NULL,
                hr INTEGER NOT NULL,
                cnt INTEGER NOT NULL,
                PRIMARY KEY (dteday, hr)
            )",
            [],
        )?;

        Ok(())
    }

    /// Whether `table_name` exists in the database.
    pub fn table_exists(&self, table_name: &str) -> SqliteResult<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
        stmt.exists([table_name])
    }

    /// Replaces the stored tables with the given records in one transaction.
    ///
    /// # Errors
    /// Returns an error if any insert fails; the database is left unchanged.
    pub fn import(&mut self, daily: &[DailyRecord], hourly: &[HourlyRecord]) -> SqliteResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM daily_records", [])?;
        tx.execute("DELETE FROM hourly_records", [])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO daily_records (dteday, season, weathersit, casual, registered, cnt)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for record in daily {
                stmt.execute(params![
                    record.date.to_string(),
                    record.season.code(),
                    record.weather_situation.code(),
                    record.casual_count,
                    record.registered_count,
                    record.total_count,
                ])?;
            }

            let mut stmt =
                tx.prepare("INSERT INTO hourly_records (dteday, hr, cnt) VALUES (?1, ?2, ?3)")?;
            for record in hourly {
                stmt.execute(params![record.date.to_string(), record.hour, record.total_count])?;
            }
        }

        tx.commit()?;
        log::info!(
            "Imported {} daily and {} hourly records",
            daily.len(),
            hourly.len()
        );
        Ok(())
    }

    /// Returns a reference to the underlying SQLite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RentalSource for SqliteSource {
    fn daily_records(&self) -> Result<Vec<DailyRecord>, SourceError> {
        let mut stmt = self.conn.prepare(
            "SELECT dteday, season, weathersit, casual, registered, cnt
             FROM daily_records ORDER BY dteday",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for (index, row) in rows.enumerate() {
            let (date, season, weather, casual, registered, total) = row?;
            let line = index as u64 + 1;
            let table = Table::Daily;

            let record = DailyRecord {
                date: parse_date(table, line, &date)?,
                season: Season::from_code(to_code(table, line, "season", season)?)
                    .map_err(|source| LoadError::InvalidCode { table, line, source })?,
                weather_situation: WeatherSituation::from_code(to_code(
                    table,
                    line,
                    "weathersit",
                    weather,
                )?)
                .map_err(|source| LoadError::InvalidCode { table, line, source })?,
                casual_count: to_count(table, line, "casual", casual)?,
                registered_count: to_count(table, line, "registered", registered)?,
                total_count: to_count(table, line, "cnt", total)?,
            };

            if !record.is_consistent() {
                return Err(LoadError::InconsistentTotal {
                    line,
                    casual: record.casual_count,
                    registered: record.registered_count,
                    total: record.total_count,
                }
                .into());
            }
            records.push(record);
        }

        Ok(records)
    }

    fn hourly_records(&self) -> Result<Vec<HourlyRecord>, SourceError> {
        let mut stmt = self
            .conn
            .prepare("SELECT dteday, hr, cnt FROM hourly_records ORDER BY dteday, hr")?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for (index, row) in rows.enumerate() {
            let (date, hour, total) = row?;
            let line = index as u64 + 1;
            let table = Table::Hourly;

            let hour = hour_from_code(to_code(table, line, "hr", hour)?)
                .map_err(|source| LoadError::InvalidCode { table, line, source })?;

            records.push(HourlyRecord {
                date: parse_date(table, line, &date)?,
                hour,
                total_count: to_count(table, line, "cnt", total)?,
            });
        }

        Ok(records)
    }
}

fn parse_date(table: Table, line: u64, value: &str) -> Result<NaiveDate, LoadError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| LoadError::Parse {
        table,
        line,
        field: "dteday",
        value: value.to_string(),
    })
}

fn to_count(table: Table, line: u64, field: &'static str, value: i64) -> Result<u64, LoadError> {
    u64::try_from(value).map_err(|_| LoadError::Parse {
        table,
        line,
        field,
        value: value.to_string(),
    })
}

fn to_code(table: Table, line: u64, field: &'static str, value: i64) -> Result<u8, LoadError> {
    u8::try_from(value).map_err(|_| LoadError::Parse {
        table,
        line,
        field,
        value: value.to_string(),
    })
}
