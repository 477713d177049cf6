//! Airport data clients
//!
//! `AviationStackClient` talks to the upstream API, `EndpointClient` talks to
//! this service's own `/api/airports` endpoint. Both implement [`AirportsApi`]
//! so the store and the server can be wired to either.

use async_trait::async_trait;

use crate::error::Result;

pub mod aviationstack;
pub mod endpoint;
#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod mock;
pub mod models;

pub use aviationstack::AviationStackClient;
pub use endpoint::EndpointClient;
#[cfg(test)]
pub use mock::MockAirportsClient;
pub use models::{Airport, AirportResponse, SearchHistoryItem};

/// Source of airport data
#[async_trait]
pub trait AirportsApi: Send + Sync {
    /// Fetch the airport dataset, optionally narrowed by exact IATA code.
    async fn fetch_airports(&self, query: Option<&str>) -> Result<AirportResponse>;
}
