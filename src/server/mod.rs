//! REST API server exposing the dashboard summaries

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::{DatasetInfo, RangeParams, SummaryResponse};
pub use state::AppState;

use crate::dataset::RentalDataset;
use crate::location::DatasetLocation;
use axum::Router;
use std::sync::Arc;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address (default: "127.0.0.1")
    pub host: String,
    /// Server port (default: 3000)
    pub port: u16,
    /// Where the rental tables are loaded from at startup
    pub dataset: DatasetLocation,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            dataset: DatasetLocation::default(),
        }
    }
}

impl ServerConfig {
    /// Creates a new server configuration
    pub fn new(host: impl Into<String>, port: u16, dataset: DatasetLocation) -> Self {
        ServerConfig {
            host: host.into(),
            port,
            dataset,
        }
    }
}

/// Builds the router over an already-loaded dataset.
pub fn app(dataset: Arc<RentalDataset>) -> Router {
    routes::create_router(Arc::new(AppState::new(dataset)))
}

/// Runs the API server
///
/// The dataset is loaded once before binding; every request afterwards
/// reads the same immutable tables.
///
/// # Returns
/// Returns an error if the dataset cannot be loaded, the address cannot be
/// bound, or the server encounters a fatal error
///
/// # Example
/// ```rust,no_run
/// use bikeshare::server::{run_server, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_server(ServerConfig::default()).await?;
///     Ok(())
/// }
/// ```
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Loading rental dataset ({})", config.dataset);
    let dataset = Arc::new(config.dataset.load().await?);
    if let Some(bounds) = dataset.bounds() {
        tracing::info!(
            "Dataset covers {} to {} ({} daily, {} hourly rows)",
            bounds.start,
            bounds.end,
            dataset.daily().len(),
            dataset.hourly().len()
        );
    } else {
        tracing::warn!("Dataset is empty; every summary will be empty");
    }

    let app = app(dataset);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
