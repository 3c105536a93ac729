//! CSV ingest for the daily and hourly rental tables.
//!
//! Raw rows are read as strings and validated field by field so that a
//! failure names the table, the line and the offending value. A single bad
//! row fails the whole load; rows are never skipped.

use crate::records::{
    hour_from_code, CodeError, DailyRecord, HourlyRecord, Season, Table, WeatherSituation,
};
use chrono::NaiveDate;
use csv::StringRecord;
use serde::Deserialize;
use std::io::Read;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Daily CSV row as published in the bike-sharing dataset.
///
/// Columns not listed here (`instant`, `temp`, `hum`, ...) are ignored.
#[derive(Debug, Deserialize)]
struct RawDailyRow {
    dteday: String,
    season: String,
    weathersit: String,
    casual: String,
    registered: String,
    cnt: String,
}

/// Hourly CSV row as published in the bike-sharing dataset.
#[derive(Debug, Deserialize)]
struct RawHourlyRow {
    dteday: String,
    hr: String,
    cnt: String,
}

/// Errors that abort a dataset load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The CSV could not be read or a required column is missing
    Csv { table: Table, message: String },
    /// A field could not be parsed as a date or a count
    Parse {
        table: Table,
        line: u64,
        field: &'static str,
        value: String,
    },
    /// A categorical code or hour is outside its domain
    InvalidCode {
        table: Table,
        line: u64,
        source: CodeError,
    },
    /// A daily row whose total differs from casual + registered
    InconsistentTotal {
        line: u64,
        casual: u64,
        registered: u64,
        total: u64,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Csv { table, message } => {
                write!(f, "CSV error in {} table: {}", table, message)
            }
            LoadError::Parse {
                table,
                line,
                field,
                value,
            } => write!(
                f,
                "Parse error in {} table, line {}: invalid {} '{}'",
                table, line, field, value
            ),
            LoadError::InvalidCode {
                table,
                line,
                source,
            } => write!(f, "Invalid value in {} table, line {}: {}", table, line, source),
            LoadError::InconsistentTotal {
                line,
                casual,
                registered,
                total,
            } => write!(
                f,
                "Inconsistent total in daily table, line {}: {} + {} != {}",
                line, casual, registered, total
            ),
        }
    }
}

impl std::error::Error for LoadError {}

/// Parses both raw tables.
///
/// Fails on the first malformed row of either table; the daily table is
/// parsed first.
pub fn load<D: Read, H: Read>(
    daily: D,
    hourly: H,
) -> Result<(Vec<DailyRecord>, Vec<HourlyRecord>), LoadError> {
    let daily = parse_daily(daily)?;
    let hourly = parse_hourly(hourly)?;
    Ok((daily, hourly))
}

/// Parses the daily table, keeping input order.
pub fn parse_daily<R: Read>(reader: R) -> Result<Vec<DailyRecord>, LoadError> {
    let records = read_rows(reader, Table::Daily, |raw: RawDailyRow, line| {
        let date = parse_date(Table::Daily, line, &raw.dteday)?;
        let season = parse_code(Table::Daily, line, "season", &raw.season, Season::from_code)?;
        let weather_situation = parse_code(
            Table::Daily,
            line,
            "weathersit",
            &raw.weathersit,
            WeatherSituation::from_code,
        )?;
        let casual_count = parse_count(Table::Daily, line, "casual", &raw.casual)?;
        let registered_count = parse_count(Table::Daily, line, "registered", &raw.registered)?;
        let total_count = parse_count(Table::Daily, line, "cnt", &raw.cnt)?;

        let record = DailyRecord {
            date,
            season,
            weather_situation,
            casual_count,
            registered_count,
            total_count,
        };

        if !record.is_consistent() {
            return Err(LoadError::InconsistentTotal {
                line,
                casual: casual_count,
                registered: registered_count,
                total: total_count,
            });
        }

        Ok(record)
    })?;

    log::debug!("Parsed {} daily rows", records.len());
    Ok(records)
}

/// Parses the hourly table, keeping input order.
pub fn parse_hourly<R: Read>(reader: R) -> Result<Vec<HourlyRecord>, LoadError> {
    let records = read_rows(reader, Table::Hourly, |raw: RawHourlyRow, line| {
        let date = parse_date(Table::Hourly, line, &raw.dteday)?;
        let hour = parse_code(Table::Hourly, line, "hr", &raw.hr, hour_from_code)?;
        let total_count = parse_count(Table::Hourly, line, "cnt", &raw.cnt)?;

        Ok(HourlyRecord {
            date,
            hour,
            total_count,
        })
    })?;

    log::debug!("Parsed {} hourly rows", records.len());
    Ok(records)
}

/// Drives a CSV reader, deserializing each row and handing it to `convert`
/// together with its 1-based file line.
fn read_rows<R, Raw, Out, F>(reader: R, table: Table, mut convert: F) -> Result<Vec<Out>, LoadError>
where
    R: Read,
    Raw: for<'de> Deserialize<'de>,
    F: FnMut(Raw, u64) -> Result<Out, LoadError>,
{
    let csv_error = |e: csv::Error| LoadError::Csv {
        table,
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut out = Vec::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record).map_err(csv_error)? {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let raw: Raw = record.deserialize(Some(&headers)).map_err(csv_error)?;
        out.push(convert(raw, line)?);
    }

    Ok(out)
}

fn parse_date(table: Table, line: u64, value: &str) -> Result<NaiveDate, LoadError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| LoadError::Parse {
        table,
        line,
        field: "dteday",
        value: value.to_string(),
    })
}

fn parse_count(table: Table, line: u64, field: &'static str, value: &str) -> Result<u64, LoadError> {
    value.parse::<u64>().map_err(|_| LoadError::Parse {
        table,
        line,
        field,
        value: value.to_string(),
    })
}

fn parse_code<T>(
    table: Table,
    line: u64,
    field: &'static str,
    value: &str,
    decode: impl Fn(u8) -> Result<T, CodeError>,
) -> Result<T, LoadError> {
    let code = value.parse::<u8>().map_err(|_| LoadError::Parse {
        table,
        line,
        field,
        value: value.to_string(),
    })?;
    decode(code).map_err(|source| LoadError::InvalidCode {
        table,
        line,
        source,
    })
}
