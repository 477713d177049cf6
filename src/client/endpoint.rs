//! Client for this service's own `/api/airports` endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use super::{AirportResponse, AirportsApi};
use crate::error::{ApiError, Result};

/// Fetches airports through the inbound API rather than going upstream.
pub struct EndpointClient {
    http: HttpClient,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl EndpointClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AirportsApi for EndpointClient {
    async fn fetch_airports(&self, query: Option<&str>) -> Result<AirportResponse> {
        let url = format!("{}/api/airports", self.base_url);

        let mut request = self.http.get(&url);
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            request = request.query(&[("query", q)]);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();

        if !status.is_success() {
            // The endpoint reports failures as `{ "error": "..." }`
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => format!("Failed to fetch airports ({})", status),
            };
            return Err(ApiError::Endpoint(message).into());
        }

        let data = response.json::<AirportResponse>().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;
        Ok(data)
    }
}
