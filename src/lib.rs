pub mod records;
pub mod time_series;
pub mod loader;
pub mod source;
pub mod sqlite_source;
pub mod download;
pub mod dataset;
pub mod summary;
pub mod pipeline;
pub mod location;
pub mod server;


pub use records::{hour_from_code, CodeError, DailyRecord, Dated, HourlyRecord, Season, Table, WeatherSituation, HOURS_PER_DAY};
pub use time_series::{date_bounds, filter_by_date, resolve_range, DateRange, RangeError};
pub use loader::LoadError;
pub use source::{CsvFileSource, InMemorySource, RentalSource, SourceError};
pub use sqlite_source::SqliteSource;
pub use download::{DatasetDownloader, DownloadError, DownloaderConfig};
pub use dataset::{RentalDataset, Selection};
pub use summary::{
    summarize_by_hour,
    summarize_by_season,
    summarize_by_weather,
    summarize_by_weather_and_season,
    summarize_casual_vs_registered,
    HourlyMean,
    RiderTotals,
    SummaryError,
    SummaryRow,
    SummaryTable,
    TimelineKey,
};
pub use summary::presentation::{HourlyPoint, LabeledTotal, RiderShares, TimelinePoint, WeatherRanking};
pub use pipeline::{DashboardPipeline, DashboardSummaries, DashboardView, PipelineWarning, RidersView};
pub use location::{DatasetLocation, TableLocation};
pub use server::{app, run_server, ApiError, AppState, ServerConfig};
