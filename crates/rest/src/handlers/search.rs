//! Search handler.
//!
//! `GET [base]/[type]?patient.identifier=..[&identifier=..][&status=..]`
//!
//! Answers with a `searchset` Bundle of every matching record. A query that
//! names both `identifier` and `patient.identifier` addresses a single record
//! and is answered by [`execute_fetch`](super::read::execute_fetch) instead.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use priorauth_fhir::ResourceType;
use priorauth_persistence::core::RecordStorage;
use tracing::debug;

use super::read::execute_fetch;
use super::validate_outbound;
use crate::error::{RestError, RestResult};
use crate::extractors::RecordQuery;
use crate::responses::{BundleBuilder, BundleEntry, ResourceHeaders, format_resource_response};
use crate::state::AppState;

/// Handler for `GET [base]/[type]`.
///
/// # Response
///
/// - `200 OK` - searchset Bundle, or the single document for a keyed query
/// - `400 Bad Request` - unsupported type, duplicate or empty parameter
/// - `404 Not Found` - keyed query matched nothing
/// - `500 Internal Server Error` - an outbound document failed validation
/// - `503 Service Unavailable` - the store is closed
pub async fn search_get_handler<S>(
    State(state): State<AppState<S>>,
    Path(resource_type): Path<String>,
    query: RecordQuery,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    let resource_type: ResourceType = resource_type.parse()?;

    debug!(
        resource_type = %resource_type,
        constraints = %query.constraints(),
        format = %query.format(),
        "Processing record GET request"
    );

    if query.is_keyed() {
        execute_fetch(&state, resource_type, &query).await
    } else {
        execute_search(&state, resource_type, &query).await
    }
}

/// Runs a search and renders the envelope.
///
/// An empty match set is an empty Bundle, never an error. Without an owner
/// constraint every record of the type matches, unless the server requires
/// one.
pub async fn execute_search<S>(
    state: &AppState<S>,
    resource_type: ResourceType,
    query: &RecordQuery,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    if state.require_patient() && query.constraints().patient().is_none() {
        return Err(RestError::malformed(
            "search requires a patient.identifier parameter",
        ));
    }

    let records = state
        .storage()
        .read_all(resource_type, query.constraints())
        .await?;

    debug!(
        resource_type = %resource_type,
        matches = records.len(),
        "Search complete"
    );

    let base_url = state.base_url();
    let self_url = match query.query_string() {
        Some(q) => format!("{}/{}?{}", base_url, resource_type, q),
        None => format!("{}/{}", base_url, resource_type),
    };

    let bundle = BundleBuilder::searchset()
        .self_link(self_url)
        .entries(
            records
                .into_iter()
                .map(|record| BundleEntry::from_record(record, base_url)),
        )
        .build();

    validate_outbound(state.validator(), &bundle)?;

    let format = query.format();
    format_resource_response(
        state.codec(),
        StatusCode::OK,
        ResourceHeaders::new(format).to_header_map(),
        &bundle,
        format,
    )
}
