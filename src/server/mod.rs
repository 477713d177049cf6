//! Inbound HTTP API
//!
//! `GET /api/airports?query=<IATA>` relays the (cached) upstream response,
//! or answers `500 {"error": "..."}` when the fetch fails for any reason.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::client::{AirportResponse, AirportsApi};
use crate::error::{Error, Result};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Upstream source, normally wrapped in the server-side response cache
    pub airports: Arc<dyn AirportsApi>,
}

impl AppState {
    pub fn new(airports: Arc<dyn AirportsApi>) -> Self {
        Self { airports }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Any failure becomes a 500 carrying the error's message
struct ServerError(Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/airports", get(get_airports))
        .with_state(state)
}

/// Serve the API on `listener` until the process exits.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr()?;
    log::info!("Listening on http://{}", addr);
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

async fn get_airports(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> std::result::Result<Json<AirportResponse>, ServerError> {
    let query = params.get("query").map(String::as_str);

    match state.airports.fetch_airports(query).await {
        Ok(response) => {
            log::info!(
                "GET /api/airports query={:?}: {} airports",
                query,
                response.data.len()
            );
            Ok(Json(response))
        }
        Err(e) => {
            log::warn!("GET /api/airports query={:?} failed: {}", query, e);
            Err(ServerError(e))
        }
    }
}
