//! Upstream airports API client

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client as HttpClient;

use super::{AirportResponse, AirportsApi};
use crate::error::{ApiError, ConfigError, Result};

/// Page size requested upstream so the whole dataset arrives in one call
pub const UPSTREAM_PAGE_SIZE: u32 = 10_000;

/// Outbound throttle: 5 requests per second
const RATE_LIMIT_PER_SECOND: u32 = 5;

/// Client for the upstream airports API.
///
/// Credentials are checked per call, so a missing key fails the request,
/// never the process start. There is no retry: a failed call surfaces
/// immediately.
pub struct AviationStackClient {
    http: HttpClient,
    base_url: Option<String>,
    access_key: Option<String>,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl AviationStackClient {
    /// Create a new upstream client
    pub fn new(base_url: Option<String>, access_key: Option<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let per_second = NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        Ok(Self {
            http,
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            access_key,
            rate_limiter,
        })
    }

    fn access_key(&self) -> Result<&str> {
        self.access_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey.into())
    }

    fn base_url(&self) -> Result<&str> {
        self.base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ConfigError::MissingBaseUrl.into())
    }
}

#[async_trait]
impl AirportsApi for AviationStackClient {
    async fn fetch_airports(&self, query: Option<&str>) -> Result<AirportResponse> {
        let access_key = self.access_key()?;
        let url = format!("{}/airports", self.base_url()?);

        let limit = UPSTREAM_PAGE_SIZE.to_string();
        let mut params = vec![("access_key", access_key), ("limit", limit.as_str())];
        if let Some(code) = query.filter(|q| !q.is_empty()) {
            params.push(("iata_code", code));
        }

        self.rate_limiter.until_ready().await;

        log::debug!("GET {} (iata_code={:?})", url, query);
        let response = self
            .http
            .get(&url)
            .query(&params)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            }
            .into());
        }

        let data = response.json::<AirportResponse>().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        log::debug!("Upstream returned {} airports", data.data.len());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use mockito::Matcher;

    const BODY: &str = r#"{
        "pagination": { "limit": 10000, "offset": 0, "count": 2, "total": 2 },
        "data": [
            { "iata_code": "BOG", "airport_name": "El Dorado International Airport" },
            { "iata_code": "JFK", "airport_name": "John F Kennedy International" }
        ]
    }"#;

    #[tokio::test]
    async fn test_missing_access_key_fails_at_call_time() {
        let client = AviationStackClient::new(Some("http://localhost".to_string()), None).unwrap();
        let err = client.fetch_airports(None).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_missing_base_url_fails_at_call_time() {
        let client = AviationStackClient::new(None, Some("key".to_string())).unwrap();
        let err = client.fetch_airports(None).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingBaseUrl)));
    }

    #[tokio::test]
    async fn test_fetch_all_requests_large_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/airports")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("access_key".into(), "secret".into()),
                Matcher::UrlEncoded("limit".into(), "10000".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;

        let client = AviationStackClient::new(
            Some(format!("{}/v1/", server.url())),
            Some("secret".to_string()),
        )
        .unwrap();

        let response = client.fetch_airports(None).await.unwrap();
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.pagination.total, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_with_query_narrows_by_iata() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/airports")
            .match_query(Matcher::UrlEncoded("iata_code".into(), "BOG".into()))
            .with_status(200)
            .with_body(BODY)
            .create_async()
            .await;

        let client =
            AviationStackClient::new(Some(server.url()), Some("secret".to_string())).unwrap();

        client.fetch_airports(Some("BOG")).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/airports")
            .match_query(Matcher::Any)
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let client =
            AviationStackClient::new(Some(server.url()), Some("secret".to_string())).unwrap();

        let err = client.fetch_airports(None).await.unwrap_err();
        assert_eq!(err.to_string(), "Error: 503 Service Unavailable");
        // No retry
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/airports")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client =
            AviationStackClient::new(Some(server.url()), Some("secret".to_string())).unwrap();

        let err = client.fetch_airports(None).await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::InvalidResponse(_))));
    }
}
