/// HTTP client for the sentiment backend
///
/// Thin wrapper over `reqwest` that turns every endpoint into a typed
/// result. No caching and no retries: the poller simply asks again on the
/// next tick.
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::shared::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::shared::error::DashboardError;
use crate::shared::types::{EarningsSummary, OptionsResponse, TickerAggregate, TickersResponse};
use crate::shared::view::Timeframe;

/// API client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Create a new configuration with custom base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Sentiment API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, DashboardError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `GET /tickers?hours=..&limit=..`
    pub async fn fetch_tickers(
        &self,
        timeframe: Timeframe,
        limit: u32,
    ) -> Result<Vec<TickerAggregate>, DashboardError> {
        let url = self.config.endpoint(&format!(
            "tickers?hours={}&limit={}",
            timeframe.hours(),
            limit
        ));
        let response: TickersResponse = self.get_json(url).await?;
        Ok(response.tickers)
    }

    /// `GET /options?hours=..`
    pub async fn fetch_options(
        &self,
        timeframe: Timeframe,
    ) -> Result<OptionsResponse, DashboardError> {
        let url = self
            .config
            .endpoint(&format!("options?hours={}", timeframe.hours()));
        self.get_json(url).await
    }

    /// `GET /earnings/{symbol}`, with a backend `error` surfaced as `Err`
    pub async fn fetch_earnings(&self, symbol: &str) -> Result<EarningsSummary, DashboardError> {
        let url = self
            .config
            .endpoint(&format!("earnings/{}", symbol.trim().to_uppercase()));
        let summary: EarningsSummary = self.get_json(url).await?;
        summary.into_result()
    }

    /// `POST /scrape`; the pipeline stats in the body are only logged
    pub async fn trigger_scrape(&self) -> Result<serde_json::Value, DashboardError> {
        let url = self.config.endpoint("scrape");
        debug!("POST {}", url);

        let response = self.http.post(&url).send().await?;
        if !response.status().is_success() {
            return Err(DashboardError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| DashboardError::Decode {
                url,
                reason: e.to_string(),
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, DashboardError> {
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DashboardError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| DashboardError::Decode {
            url,
            reason: e.to_string(),
        })
    }
}
