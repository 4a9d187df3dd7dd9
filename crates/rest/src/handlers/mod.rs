//! HTTP request handlers.
//!
//! - [`search`] - Search records of a type; a keyed query becomes a fetch
//! - [`read`] - Fetch the single record named by id and owner
//! - [`delete`] - Delete the record named by id and owner
//! - [`health`] - Health check endpoint
//!
//! Every document leaving through these handlers is validated first; an
//! invalid document is never sent.

pub mod delete;
pub mod health;
pub mod read;
pub mod search;

pub use delete::delete_handler;
pub use health::health_handler;
pub use read::execute_fetch;
pub use search::{execute_search, search_get_handler};

use priorauth_fhir::Validator;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::{RestError, RestResult};

/// Runs `validator` over an outbound document.
///
/// Error diagnostics are logged and returned as
/// [`RestError::ValidationFailure`].
pub(crate) fn validate_outbound(validator: &dyn Validator, resource: &Value) -> RestResult<()> {
    let outcome = validator.validate(resource);
    let resource_type = outcome
        .resource_type
        .clone()
        .unwrap_or_else(|| "unknown".to_string());

    if outcome.is_valid() {
        if outcome.warning_count() > 0 {
            debug!(
                resource_type = %resource_type,
                warnings = outcome.warning_count(),
                "Outbound document passed validation with warnings"
            );
        }
        return Ok(());
    }

    for issue in outcome.errors() {
        warn!(resource_type = %resource_type, issue = %issue, "Validation issue");
    }
    error!(
        resource_type = %resource_type,
        errors = outcome.error_count(),
        "Outbound document failed validation"
    );

    Err(RestError::ValidationFailure {
        resource_type,
        issues: outcome.issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use priorauth_fhir::StructuralValidator;
    use serde_json::json;

    #[test]
    fn test_valid_document_passes() {
        let bundle = json!({"resourceType": "Bundle", "type": "searchset", "total": 0});
        assert!(validate_outbound(&StructuralValidator::new(), &bundle).is_ok());
    }

    #[test]
    fn test_invalid_document_carries_issues() {
        let claim = json!({"resourceType": "Claim", "id": "minimal", "status": "bogus"});
        let err = validate_outbound(&StructuralValidator::new(), &claim).unwrap_err();
        match err {
            RestError::ValidationFailure {
                resource_type,
                issues,
            } => {
                assert_eq!(resource_type, "Claim");
                assert!(issues.iter().any(|i| i.expression.as_deref() == Some("Claim.status")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
