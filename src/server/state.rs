//! Shared application state for the API server

use crate::dataset::RentalDataset;
use crate::pipeline::DashboardPipeline;
use std::sync::Arc;

/// Shared application state
///
/// The dataset is loaded once before the server starts and is never
/// mutated, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: DashboardPipeline,
}

impl AppState {
    /// Creates a new application state
    pub fn new(dataset: Arc<RentalDataset>) -> Self {
        AppState {
            pipeline: DashboardPipeline::new(dataset),
        }
    }
}
