//! Fetch of a single record.
//!
//! `GET [base]/[type]?identifier=..&patient.identifier=..`

use axum::{http::StatusCode, response::Response};
use priorauth_fhir::ResourceType;
use priorauth_persistence::core::RecordStorage;
use tracing::debug;

use super::validate_outbound;
use crate::error::{RestError, RestResult};
use crate::extractors::RecordQuery;
use crate::responses::{ResourceHeaders, format_resource_response};
use crate::state::AppState;

/// Fetches the record keyed by the query's `identifier` and
/// `patient.identifier`, further filtered by any other constraint.
///
/// # Response
///
/// - `200 OK` - the stored document
/// - `404 Not Found` - no record matches
pub async fn execute_fetch<S>(
    state: &AppState<S>,
    resource_type: ResourceType,
    query: &RecordQuery,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    let constraints = query.constraints();
    let Some(record) = state.storage().read(resource_type, constraints).await? else {
        debug!(
            resource_type = %resource_type,
            constraints = %constraints,
            "Record not found"
        );
        return Err(RestError::NotFound {
            resource_type,
            constraints: constraints.to_string(),
        });
    };

    validate_outbound(state.validator(), record.document())?;

    debug!(
        resource_type = %resource_type,
        id = %record.id(),
        patient = %record.patient(),
        "Returning record"
    );

    let format = query.format();
    format_resource_response(
        state.codec(),
        StatusCode::OK,
        ResourceHeaders::from_record(&record, format).to_header_map(),
        record.document(),
        format,
    )
}
