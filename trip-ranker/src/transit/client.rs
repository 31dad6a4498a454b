//! Trip-planner HTTP client.
//!
//! Fetches raw itinerary records from the transit backend. Plans come back
//! untyped; turning them into `TripPlan`s is the conversion step's job.

use std::sync::Arc;

use reqwest::StatusCode;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::planner::PlanSource;

use super::error::TransitError;
use super::query::TripQuery;
use super::types::TripPlannerResponse;

/// Default base URL for the trip-planner API.
const DEFAULT_BASE_URL: &str = "https://api.winnipegtransit.com/v3";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the trip-planner client.
#[derive(Debug, Clone)]
pub struct TransitConfig {
    /// API key, sent as the `api-key` query parameter
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TransitConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Trip-planner API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct TransitClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl TransitClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TransitConfig) -> Result<Self, TransitError> {
        if config.max_concurrent == 0 {
            return Err(TransitError::NotConfigured(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Fetch raw plans for a trip.
    ///
    /// Returns every plan record in the response, undecoded.
    pub async fn get_trip_plans(
        &self,
        query: &TripQuery,
    ) -> Result<Vec<serde_json::Value>, TransitError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TransitError::NotConfigured("request semaphore closed".to_string()))?;

        let url = format!("{}/trip-planner.json", self.base_url);
        debug!(origin = %query.origin, destination = %query.destination, "fetching trip plans");

        let response = self
            .http
            .get(&url)
            .query(&query_params(query, &self.api_key))
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TransitError::Unauthorized);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TransitError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransitError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

impl PlanSource for TransitClient {
    async fn fetch_plans(&self, query: &TripQuery) -> Result<Vec<serde_json::Value>, TransitError> {
        self.get_trip_plans(query).await
    }
}

/// Query-string parameters for a trip-planner request.
fn query_params(query: &TripQuery, api_key: &str) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("origin", query.origin.clone()),
        ("destination", query.destination.clone()),
    ];

    if let Some(at) = query.at {
        params.push(("date", at.format("%Y-%m-%d").to_string()));
        params.push(("time", at.format("%H:%M").to_string()));
    }

    params.push(("api-key", api_key.to_string()));
    params
}

/// Decode a trip-planner response body.
fn parse_response(body: &str) -> Result<Vec<serde_json::Value>, TransitError> {
    let response: TripPlannerResponse =
        serde_json::from_str(body).map_err(|e| TransitError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })?;

    Ok(response.plans)
}
