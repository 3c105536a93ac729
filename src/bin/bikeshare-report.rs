//! Prints every dashboard summary for a date range as plain text.
//!
//! Run with: `cargo run --bin bikeshare-report -- [START] [END]`
//!
//! Dates are `YYYY-MM-DD`; a missing end defaults to the last day of the
//! dataset. The dataset location is read from the same environment
//! variables as the server.

use bikeshare::{DashboardPipeline, DashboardView, DatasetLocation};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn parse_arg(value: Option<String>, which: &str) -> Result<Option<NaiveDate>, String> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map_err(|e| format!("Invalid {} date '{}': {}", which, v, e))
        })
        .transpose()
}

fn print_view(view: &DashboardView) {
    match view.range {
        Some(range) => println!("Range: {} to {}", range.start, range.end),
        None => println!("Range: (no overlap with dataset)"),
    }
    for warning in &view.warnings {
        println!("Warning: {}", warning);
    }

    println!();
    println!("Most rented weather:");
    for row in &view.weather.most_rented {
        println!("  {:<18} {:>10}", row.label, row.total);
    }
    println!("Least rented weather:");
    for row in &view.weather.least_rented {
        println!("  {:<18} {:>10}", row.label, row.total);
    }

    println!();
    println!("Rentals by season:");
    for row in &view.season {
        println!("  {:<18} {:>10}", row.label, row.total);
    }

    println!();
    println!("Rentals over time:");
    for point in &view.timeline {
        println!(
            "  {} {:<18} {:<8} {:>8}",
            point.date, point.weather_label, point.season_label, point.total
        );
    }

    println!();
    println!("Mean rentals per hour:");
    for point in &view.hourly {
        println!("  {:02}:00 {:>10.2} ({} days)", point.hour, point.mean, point.samples);
    }

    println!();
    println!("Riders:");
    println!("  Casual     {:>10}", view.riders.casual);
    println!("  Registered {:>10}", view.riders.registered);
    match view.riders.shares {
        Some(shares) => {
            let (casual, registered) = shares.formatted();
            println!("  Share      {} casual / {} registered", casual, registered);
        }
        None => println!("  Share      undefined (no riders)"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let start = parse_arg(args.next(), "start")?;
    let end = parse_arg(args.next(), "end")?;

    let location = DatasetLocation::from_env();
    let dataset = Arc::new(location.load().await?);
    let pipeline = DashboardPipeline::new(dataset);

    let view = pipeline.run_request(start, end)?.present();
    print_view(&view);

    Ok(())
}
