//! Delete handler.
//!
//! `DELETE [base]/[type]?identifier=..&patient.identifier=..`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use priorauth_fhir::ResourceType;
use priorauth_fhir::outcome::{self, Issue, IssueType};
use priorauth_persistence::core::RecordStorage;
use tracing::{debug, info};

use crate::error::{RestError, RestResult};
use crate::extractors::RecordQuery;
use crate::responses::{ResourceHeaders, format_resource_response};
use crate::state::AppState;

/// Handler for `DELETE [base]/[type]`.
///
/// Deleting an absent record succeeds, so repeating a delete is harmless.
///
/// # Response
///
/// - `200 OK` - informational OperationOutcome
/// - `400 Bad Request` - `identifier` or `patient.identifier` missing
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    Path(resource_type): Path<String>,
    query: RecordQuery,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    let resource_type: ResourceType = resource_type.parse()?;
    let constraints = query.constraints();

    let (Some(id), Some(patient)) = (constraints.id(), constraints.patient()) else {
        return Err(RestError::malformed(
            "delete requires identifier and patient.identifier parameters",
        ));
    };

    debug!(
        resource_type = %resource_type,
        id = %id,
        patient = %patient,
        "Processing delete request"
    );

    let removed = state.storage().delete(resource_type, id, patient).await?;

    let diagnostics = if removed {
        info!(resource_type = %resource_type, id = %id, patient = %patient, "Record deleted");
        format!("Deleted {}/{}", resource_type, id)
    } else {
        format!("No {}/{} to delete", resource_type, id)
    };
    let body = outcome::operation_outcome([&Issue::information(
        IssueType::Informational,
        diagnostics,
    )]);

    let format = query.format();
    format_resource_response(
        state.codec(),
        StatusCode::OK,
        ResourceHeaders::new(format).to_header_map(),
        &body,
        format,
    )
}
