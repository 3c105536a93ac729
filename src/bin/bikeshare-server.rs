//! Bike-share Dashboard API Server Binary
//!
//! Run with: `cargo run --bin bikeshare-server`

use bikeshare::{run_server, DatasetLocation, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control log level, e.g.
    //   RUST_LOG=bikeshare=debug,tower_http=debug cargo run --bin bikeshare-server
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or(3000);
    let dataset = DatasetLocation::from_env();

    let config = ServerConfig::new(host, port, dataset);

    println!("🚲 Starting Bike-share Dashboard API Server...");
    println!("   Host: {}", config.host);
    println!("   Port: {}", config.port);
    println!("   Dataset: {}", config.dataset);
    println!();
    println!(
        "Server will be available at: http://{}:{}",
        config.host, config.port
    );
    println!();
    println!("Available endpoints (all summaries accept ?start=YYYY-MM-DD&end=YYYY-MM-DD):");
    println!("  GET  /health                 - Health check");
    println!("  GET  /dataset                - Row counts and date bounds");
    println!("  GET  /summaries              - All summaries");
    println!("  GET  /summaries/weather      - Most and least rented weather");
    println!("  GET  /summaries/season       - Rentals per season");
    println!("  GET  /summaries/timeline     - Rentals per date, weather and season");
    println!("  GET  /summaries/hourly       - Mean rentals per hour of day");
    println!("  GET  /summaries/riders       - Casual vs registered riders");
    println!();

    run_server(config).await?;

    Ok(())
}
