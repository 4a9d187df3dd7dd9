//! Health check endpoint handler.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use priorauth_fhir::ResourceType;
use priorauth_persistence::core::RecordStorage;
use serde::Serialize;
use tracing::debug;

use crate::error::RestResult;
use crate::state::AppState;

/// Body of a successful health check.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// Always `healthy`; an unhealthy store answers with an error instead.
    pub status: &'static str,
    /// Storage backend name.
    pub backend: &'static str,
    /// Time of the check (RFC 3339).
    pub timestamp: String,
    /// Live record count per resource type.
    pub records: BTreeMap<&'static str, usize>,
}

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Store is open; body is a [`HealthReport`]
/// - `503 Service Unavailable` - Store is closed
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!("Processing health check request");

    let mut records = BTreeMap::new();
    for resource_type in ResourceType::ALL {
        let count = state.storage().count(resource_type).await?;
        records.insert(resource_type.as_str(), count);
    }

    let report = HealthReport {
        status: "healthy",
        backend: state.storage().backend_name(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        records,
    };

    let mut response = (StatusCode::OK, Json(report)).into_response();
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    Ok(response)
}
