use crate::dataset::RentalDataset;
use crate::loader::LoadError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Published location of the daily table (`day.csv`).
pub const DEFAULT_DAILY_URL: &str = "https://raw.githubusercontent.com/aalvinw/bike-sharing-dataset-analys-using-streamlit/refs/heads/main/day.csv";
/// Published location of the hourly table (`hour.csv`).
pub const DEFAULT_HOURLY_URL: &str = "https://raw.githubusercontent.com/aalvinw/bike-sharing-dataset-analys-using-streamlit/refs/heads/main/hour.csv";

/// Configuration for the dataset downloader
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Maximum number of retry attempts after the first request (default: 3)
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each further retry (default: 500)
    pub retry_delay_ms: u64,
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        DownloaderConfig {
            max_retries: 3,
            retry_delay_ms: 500,
            timeout_seconds: 30,
        }
    }
}

/// Fetches the raw rental CSV tables over HTTP.
///
/// This is a collaborator of the pipeline, not part of it: once the text is
/// fetched the dataset is parsed once and never refetched.
#[derive(Debug)]
pub struct DatasetDownloader {
    client: Client,
    config: DownloaderConfig,
}

impl DatasetDownloader {
    /// Creates a downloader with default configuration.
    ///
    /// # Returns
    /// Returns an error if HTTP client creation fails.
    pub fn new() -> Result<Self, DownloadError> {
        Self::with_config(DownloaderConfig::default())
    }

    /// Creates a downloader with custom configuration.
    pub fn with_config(config: DownloaderConfig) -> Result<Self, DownloadError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DownloadError::ClientCreation(e.to_string()))?;

        Ok(DatasetDownloader { client, config })
    }

    /// Fetches the body of `url` as text.
    ///
    /// Network failures and 5xx responses are retried up to
    /// `config.max_retries` times; 4xx responses fail immediately.
    ///
    /// # Errors
    /// Returns `DownloadError` once the attempts are exhausted.
    pub async fn fetch_csv(&self, url: &str) -> Result<String, DownloadError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.retry_delay_ms.saturating_mul(1u64 << attempt.min(16));
                    attempt += 1;
                    log::warn!(
                        "Fetching {} failed ({}), retry {}/{} in {}ms",
                        url,
                        err,
                        attempt,
                        self.config.max_retries,
                        delay
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::ApiError {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| DownloadError::ParseError(e.to_string()))
    }

    /// Fetches both tables and parses them into a dataset.
    pub async fn fetch_dataset(
        &self,
        daily_url: &str,
        hourly_url: &str,
    ) -> Result<RentalDataset, DownloadError> {
        log::info!("Downloading daily table from {}", daily_url);
        let daily = self.fetch_csv(daily_url).await?;
        log::info!("Downloading hourly table from {}", hourly_url);
        let hourly = self.fetch_csv(hourly_url).await?;

        RentalDataset::from_csv(daily.as_bytes(), hourly.as_bytes()).map_err(DownloadError::Load)
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }
}

/// Errors that can occur while downloading the rental tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    /// HTTP client creation failed
    ClientCreation(String),
    /// Network error occurred
    NetworkError(String),
    /// Server returned a non-success status
    ApiError { status: u16, message: String },
    /// Response body could not be read
    ParseError(String),
    /// The downloaded CSV was malformed
    Load(LoadError),
}

impl DownloadError {
    fn is_retryable(&self) -> bool {
        match self {
            DownloadError::NetworkError(_) => true,
            DownloadError::ApiError { status, .. } => StatusCode::from_u16(*status)
                .map(|s| s.is_server_error())
                .unwrap_or(false),
            _ => false,
        }
    }
}

impl std::fmt::Display for DownloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadError::ClientCreation(msg) => write!(f, "Client creation error: {}", msg),
            DownloadError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DownloadError::ApiError { status, message } => {
                write!(f, "API error: HTTP {}: {}", status, message)
            }
            DownloadError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DownloadError::Load(err) => write!(f, "Invalid dataset: {}", err),
        }
    }
}

impl std::error::Error for DownloadError {}
