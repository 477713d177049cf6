//! Mock airports client for testing
//!
//! Provides a mock implementation of [`AirportsApi`] for unit tests
//! without making real HTTP calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, oneshot};

use super::{AirportResponse, AirportsApi};
use crate::error::{ApiError, Result};

/// A queued reply, optionally held back until its gate is released.
struct MockReply {
    result: std::result::Result<AirportResponse, ApiError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Mock API client for testing.
///
/// Queued replies are consumed in call order; once the queue is empty every
/// call returns the default response.
///
/// # Example
/// ```ignore
/// let mock = MockAirportsClient::new().with_response(response(vec![bog()]));
/// let data = mock.fetch_airports(None).await?;
/// assert_eq!(data.data.len(), 1);
/// ```
#[derive(Default)]
pub struct MockAirportsClient {
    default_response: Arc<Mutex<AirportResponse>>,
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<Option<String>>>>,
}

impl MockAirportsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response returned when no queued reply is pending.
    pub fn with_response(self, response: AirportResponse) -> Self {
        // Builders run before any call, the lock is uncontended.
        if let Ok(mut guard) = self.default_response.try_lock() {
            *guard = response;
        }
        self
    }

    /// Queue an error for the next call.
    pub fn with_error(self, error: ApiError) -> Self {
        if let Ok(mut replies) = self.replies.try_lock() {
            replies.push_back(MockReply {
                result: Err(error),
                gate: None,
            });
        }
        self
    }

    /// Queue a reply that resolves only once the returned sender fires.
    pub async fn push_gated(&self, response: AirportResponse) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().await.push_back(MockReply {
            result: Ok(response),
            gate: Some(rx),
        });
        tx
    }

    /// Number of fetch calls made so far.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Queries passed to each call, in order.
    pub async fn captured_queries(&self) -> Vec<Option<String>> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl AirportsApi for MockAirportsClient {
    async fn fetch_airports(&self, query: Option<&str>) -> Result<AirportResponse> {
        self.calls.lock().await.push(query.map(str::to_string));

        let reply = self.replies.lock().await.pop_front();
        match reply {
            Some(MockReply { result, gate }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                result.map_err(Into::into)
            }
            None => Ok(self.default_response.lock().await.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::{bog, response};

    #[tokio::test]
    async fn test_default_response_and_counts() {
        let mock = MockAirportsClient::new().with_response(response(vec![bog()]));

        let first = mock.fetch_airports(None).await.unwrap();
        let second = mock.fetch_airports(Some("BOG")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.call_count().await, 2);
        assert_eq!(
            mock.captured_queries().await,
            vec![None, Some("BOG".to_string())]
        );
    }

    #[tokio::test]
    async fn test_queued_error_consumed_once() {
        let mock = MockAirportsClient::new().with_error(ApiError::Upstream {
            status: 503,
            reason: "Service Unavailable".to_string(),
        });

        assert!(mock.fetch_airports(None).await.is_err());
        assert!(mock.fetch_airports(None).await.is_ok());
    }
}
