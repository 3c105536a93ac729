use bikeshare::{
    filter_by_date, summarize_by_hour, summarize_by_season, summarize_by_weather,
    summarize_by_weather_and_season, summarize_casual_vs_registered, DailyRecord,
    DashboardPipeline, DateRange, HourlyRecord, RangeError, RentalDataset, RiderShares,
    RiderTotals, Season, WeatherSituation,
};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn two_day_dataset() -> RentalDataset {
    let daily = vec![
        DailyRecord::new(date(2011, 1, 1), Season::Spring, WeatherSituation::Clear, 10, 90),
        DailyRecord::new(date(2011, 1, 2), Season::Spring, WeatherSituation::Misty, 5, 45),
    ];
    let hourly = vec![
        HourlyRecord::new(date(2011, 1, 1), 8, 60),
        HourlyRecord::new(date(2011, 1, 1), 17, 40),
        HourlyRecord::new(date(2011, 1, 2), 8, 50),
    ];
    RentalDataset::new(daily, hourly)
}

/// A deterministic year of records cycling through every category.
fn year_of_records() -> (Vec<DailyRecord>, Vec<HourlyRecord>) {
    let start = date(2011, 1, 1);
    let mut daily = Vec::new();
    let mut hourly = Vec::new();
    for offset in 0..365u64 {
        let day = start + Duration::days(offset as i64);
        let season = Season::ALL[(offset / 92) as usize % 4];
        let weather = WeatherSituation::ALL[(offset % 7 % 4) as usize];
        daily.push(DailyRecord::new(day, season, weather, offset % 50, 100 + offset * 3));
        for hour in (0..24u8).step_by(3) {
            hourly.push(HourlyRecord::new(day, hour, offset + hour as u64));
        }
    }
    (daily, hourly)
}

#[test]
fn single_day_selection_matches_hand_computed_tables() {
    let pipeline = DashboardPipeline::new(Arc::new(two_day_dataset()));
    let summaries = pipeline.run(&DateRange::single_day(date(2011, 1, 1))).unwrap();

    let weather: Vec<_> = summaries
        .by_weather
        .rows()
        .iter()
        .map(|row| (row.key, row.value))
        .collect();
    assert_eq!(weather, vec![(WeatherSituation::Clear, 100)]);
    assert_eq!(summaries.riders, RiderTotals { casual: 10, registered: 90 });
    assert_eq!(summaries.by_hour.get(&8).unwrap().mean, 60.0);
}

#[test]
fn inverted_range_is_an_error_everywhere() {
    let dataset = two_day_dataset();
    let inverted = DateRange::new(date(2011, 1, 2), date(2011, 1, 1));

    assert!(matches!(
        filter_by_date(dataset.daily(), &inverted),
        Err(RangeError::InvalidRange { .. })
    ));
    assert!(dataset.select(&inverted).is_err());
    assert!(DashboardPipeline::new(Arc::new(dataset)).run(&inverted).is_err());
}

#[test]
fn full_range_filter_is_identity() {
    let (daily, hourly) = year_of_records();
    let range = DateRange::new(date(2011, 1, 1), date(2011, 12, 31));

    assert_eq!(filter_by_date(&daily, &range).unwrap(), daily);
    assert_eq!(filter_by_date(&hourly, &range).unwrap(), hourly);
}

#[test]
fn filtered_records_all_lie_in_range() {
    let (daily, _) = year_of_records();
    let range = DateRange::new(date(2011, 4, 15), date(2011, 6, 2));
    let selected = filter_by_date(&daily, &range).unwrap();

    assert_eq!(selected.len() as i64, range.num_days());
    assert!(selected.iter().all(|r| range.contains(r.date)));
}

#[test]
fn totals_are_conserved_across_groupings() {
    let (daily, _) = year_of_records();
    let range = DateRange::new(date(2011, 2, 10), date(2011, 9, 30));
    let selected = filter_by_date(&daily, &range).unwrap();
    let grand_total: u64 = selected.iter().map(|r| r.total_count).sum();

    assert_eq!(summarize_by_weather(&selected).grand_total(), grand_total);
    assert_eq!(summarize_by_season(&selected).grand_total(), grand_total);
    assert_eq!(summarize_by_weather_and_season(&selected).grand_total(), grand_total);
    assert_eq!(summarize_casual_vs_registered(&selected).total(), grand_total);
}

#[test]
fn summary_keys_are_sorted_and_unique() {
    let (daily, _) = year_of_records();
    let timeline = summarize_by_weather_and_season(&daily);
    let keys: Vec<_> = timeline.keys().copied().collect();
    assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));

    let weather: Vec<_> = summarize_by_weather(&daily).keys().copied().collect();
    assert_eq!(weather, WeatherSituation::ALL.to_vec());
}

#[test]
fn hourly_means_cover_every_hour() {
    let (_, hourly) = year_of_records();
    let range = DateRange::new(date(2011, 1, 1), date(2011, 1, 10));
    let selected = filter_by_date(&hourly, &range).unwrap();
    let table = summarize_by_hour(&selected);

    assert_eq!(table.len(), 24);
    // Hour h on day offset d has count d + h, so the mean over d = 0..10 is 4.5 + h
    let three = table.get(&3).unwrap();
    assert_eq!(three.samples, 10);
    assert!((three.mean - 7.5).abs() < 1e-9);
    assert_eq!(table.get(&4).unwrap().samples, 0);
    assert_eq!(table.get(&4).unwrap().mean, 0.0);
}

#[test]
fn rider_shares_sum_to_one_hundred() {
    let (daily, _) = year_of_records();
    let totals = summarize_casual_vs_registered(&daily);
    let shares = RiderShares::from_totals(&totals).unwrap();

    assert!((shares.casual_pct + shares.registered_pct - 100.0).abs() < 1e-9);
    assert!(RiderShares::from_totals(&RiderTotals::default()).is_err());
}

#[test]
fn pipeline_runs_are_independent_of_previous_ranges() {
    let (daily, hourly) = year_of_records();
    let pipeline = DashboardPipeline::new(Arc::new(RentalDataset::new(daily, hourly)));
    let summer = DateRange::new(date(2011, 6, 1), date(2011, 8, 31));

    let first = pipeline.run(&summer).unwrap();
    pipeline.run(&DateRange::single_day(date(2011, 1, 1))).unwrap();
    let again = pipeline.run(&summer).unwrap();

    assert_eq!(first, again);
}
