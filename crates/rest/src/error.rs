//! Error types for the REST API.
//!
//! Every error leaves the service as a FHIR OperationOutcome with the status
//! code below:
//!
//! | Error | HTTP Status | FHIR Issue Code |
//! |-------|-------------|-----------------|
//! | NotFound | 404 | not-found |
//! | MalformedInput | 400 | invalid |
//! | UnsupportedResourceType | 400 | not-supported |
//! | ValidationFailure | 500 | one issue per diagnostic |
//! | StorageFault (unavailable) | 503 | transient |
//! | StorageFault (internal) | 500 | exception |
//! | Serialization | 500 | exception |

use std::fmt;

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use priorauth_fhir::outcome::{self, Issue, IssueType};
use priorauth_fhir::{ResourceType, UnsupportedResourceType};
use priorauth_persistence::error::{BackendError, StorageError};
use priorauth_serde::SerdeError;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// No record matched a fetch (HTTP 404).
    NotFound {
        /// The resource type searched.
        resource_type: ResourceType,
        /// The constraints that matched nothing, as `id=..&patient=..`.
        constraints: String,
    },

    /// The request cannot be interpreted (HTTP 400).
    MalformedInput {
        /// Error message.
        message: String,
    },

    /// The path names a resource type the service does not hold (HTTP 400).
    UnsupportedResourceType {
        /// The type name from the path.
        resource_type: String,
    },

    /// An outbound document failed validation (HTTP 500).
    ValidationFailure {
        /// The resource type of the rejected document.
        resource_type: String,
        /// Every issue the validator reported.
        issues: Vec<Issue>,
    },

    /// The store failed (HTTP 503 when transient, 500 otherwise).
    StorageFault {
        /// Whether the fault may clear without intervention.
        transient: bool,
        /// Error message.
        message: String,
    },

    /// A document could not be written in the negotiated format (HTTP 500).
    Serialization {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Creates a [`RestError::MalformedInput`].
    pub fn malformed(message: impl Into<String>) -> Self {
        RestError::MalformedInput {
            message: message.into(),
        }
    }

    /// Returns the HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::MalformedInput { .. } | RestError::UnsupportedResourceType { .. } => {
                StatusCode::BAD_REQUEST
            }
            RestError::StorageFault {
                transient: true, ..
            } => StatusCode::SERVICE_UNAVAILABLE,
            RestError::ValidationFailure { .. }
            | RestError::StorageFault { .. }
            | RestError::Serialization { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the OperationOutcome issues describing this error.
    pub fn issues(&self) -> Vec<Issue> {
        match self {
            RestError::ValidationFailure { issues, .. } => issues.clone(),
            RestError::NotFound { .. } => vec![Issue::error(IssueType::NotFound, self.to_string())],
            RestError::MalformedInput { .. } => {
                vec![Issue::error(IssueType::Invalid, self.to_string())]
            }
            RestError::UnsupportedResourceType { .. } => {
                vec![Issue::error(IssueType::NotSupported, self.to_string())]
            }
            RestError::StorageFault {
                transient: true, ..
            } => vec![Issue::error(IssueType::Transient, self.to_string())],
            RestError::StorageFault { .. } | RestError::Serialization { .. } => {
                vec![Issue::error(IssueType::Exception, self.to_string())]
            }
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound {
                resource_type,
                constraints,
            } => write!(f, "No {} matches {}", resource_type, constraints),
            RestError::MalformedInput { message } => write!(f, "Malformed request: {}", message),
            RestError::UnsupportedResourceType { resource_type } => {
                write!(f, "Unsupported resource type: {}", resource_type)
            }
            RestError::ValidationFailure {
                resource_type,
                issues,
            } => write!(
                f,
                "{} failed validation with {} issue(s)",
                resource_type,
                issues.len()
            ),
            RestError::StorageFault { message, .. } => write!(f, "Storage fault: {}", message),
            RestError::Serialization { message } => {
                write!(f, "Serialization failed: {}", message)
            }
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = outcome::operation_outcome(&self.issues());

        let mut response = (status, axum::Json(body)).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/fhir+json"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        response
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::IncompleteKey { .. } | StorageError::InvalidRecord { .. } => {
                RestError::MalformedInput {
                    message: err.to_string(),
                }
            }
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        RestError::StorageFault {
            transient: matches!(err, BackendError::Unavailable { .. }),
            message: err.to_string(),
        }
    }
}

impl From<SerdeError> for RestError {
    fn from(err: SerdeError) -> Self {
        RestError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<UnsupportedResourceType> for RestError {
    fn from(err: UnsupportedResourceType) -> Self {
        RestError::UnsupportedResourceType {
            resource_type: err.0,
        }
    }
}

/// Result type for REST operations.
pub type RestResult<T> = Result<T, RestError>;
