//! HTTP request handlers for API endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;
use crate::pipeline::{DashboardView, PipelineWarning, RidersView};
use crate::records::{DailyRecord, HourlyRecord, Table};
use crate::summary::presentation::{
    hourly_points, labeled, timeline_points, HourlyPoint, LabeledTotal, TimelinePoint,
    WeatherRanking,
};
use crate::summary::{
    summarize_by_hour, summarize_by_season, summarize_by_weather,
    summarize_by_weather_and_season, summarize_casual_vs_registered,
};
use crate::time_series::DateRange;

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}

/// Response for the dataset description
#[derive(Debug, Serialize)]
pub struct DatasetInfo {
    pub daily_rows: usize,
    pub hourly_rows: usize,
    pub data_available_from: Option<NaiveDate>,
    pub data_available_to: Option<NaiveDate>,
}

/// GET /dataset - Row counts and the selectable date bounds
pub async fn dataset_info(State(state): State<Arc<AppState>>) -> Json<DatasetInfo> {
    let dataset = state.pipeline.dataset();
    let bounds = dataset.bounds();

    Json(DatasetInfo {
        daily_rows: dataset.daily().len(),
        hourly_rows: dataset.hourly().len(),
        data_available_from: bounds.map(|b| b.start),
        data_available_to: bounds.map(|b| b.end),
    })
}

/// Optional date range query parameters (`YYYY-MM-DD`)
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl RangeParams {
    fn parse(value: &Option<String>, which: &str) -> Result<Option<NaiveDate>, ApiError> {
        match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .map(Some)
                .map_err(|e| ApiError::InvalidDateRange(format!("Invalid {} date: {}", which, e))),
        }
    }

    fn dates(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ApiError> {
        Ok((Self::parse(&self.start, "start")?, Self::parse(&self.end, "end")?))
    }
}

/// A single summary together with the range it was computed for
#[derive(Debug, Serialize)]
pub struct SummaryResponse<T> {
    pub range: Option<DateRange>,
    pub warnings: Vec<PipelineWarning>,
    pub data: T,
}

fn compute_view(state: &AppState, params: &RangeParams) -> Result<DashboardView, ApiError> {
    let (start, end) = params.dates()?;
    let summaries = state.pipeline.run_request(start, end)?;
    Ok(summaries.present())
}

/// Selects the requested rows and computes only the one summary asked for.
///
/// `table` is the table the summary reads; its empty-selection warning is
/// the only one reported.
fn respond<T>(
    state: &AppState,
    params: &RangeParams,
    table: Table,
    summarize: impl FnOnce(&[DailyRecord], &[HourlyRecord]) -> T,
) -> Result<Json<SummaryResponse<T>>, ApiError> {
    let (start, end) = params.dates()?;
    let selection = state.pipeline.select_request(start, end)?;

    let (range, daily, hourly) = match &selection {
        Some(selection) => (
            Some(selection.range),
            selection.daily.as_slice(),
            selection.hourly.as_slice(),
        ),
        None => (None, &[][..], &[][..]),
    };
    let rows = match table {
        Table::Daily => daily.len(),
        Table::Hourly => hourly.len(),
    };

    Ok(Json(SummaryResponse {
        range,
        warnings: PipelineWarning::for_rows(table, rows).into_iter().collect(),
        data: summarize(daily, hourly),
    }))
}

/// GET /summaries - All five summaries
pub async fn get_summaries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<DashboardView>, ApiError> {
    Ok(Json(compute_view(&state, &params)?))
}

/// GET /summaries/weather - Weather totals with most and least rented orders
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<SummaryResponse<WeatherRanking>>, ApiError> {
    respond(&state, &params, Table::Daily, |daily, _| {
        WeatherRanking::from_table(&summarize_by_weather(daily))
    })
}

/// GET /summaries/season - Labelled season totals
pub async fn get_season(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<SummaryResponse<Vec<LabeledTotal>>>, ApiError> {
    respond(&state, &params, Table::Daily, |daily, _| {
        labeled(&summarize_by_season(daily))
    })
}

/// GET /summaries/timeline - Totals per (date, weather, season)
pub async fn get_timeline(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<SummaryResponse<Vec<TimelinePoint>>>, ApiError> {
    respond(&state, &params, Table::Daily, |daily, _| {
        timeline_points(&summarize_by_weather_and_season(daily))
    })
}

/// GET /summaries/hourly - Mean rentals per hour of day
pub async fn get_hourly(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<SummaryResponse<Vec<HourlyPoint>>>, ApiError> {
    respond(&state, &params, Table::Hourly, |_, hourly| {
        hourly_points(&summarize_by_hour(hourly))
    })
}

/// GET /summaries/riders - Casual vs registered totals and shares
pub async fn get_riders(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<SummaryResponse<RidersView>>, ApiError> {
    respond(&state, &params, Table::Daily, |daily, _| {
        RidersView::from_totals(summarize_casual_vs_registered(daily))
    })
}
