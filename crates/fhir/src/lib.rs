//! # priorauth-fhir
//!
//! Resource definitions for the prior authorization record service.
//!
//! - [`ResourceType`]: the storable document kinds and per-type status derivation
//! - [`model`]: the static element model shared by the XML codec and the validator
//! - [`validation`]: the [`Validator`] seam and the [`StructuralValidator`]
//! - [`outcome`]: OperationOutcome issues
//!
//! ```
//! use priorauth_fhir::{ResourceType, StructuralValidator, Validator};
//! use serde_json::json;
//!
//! let rt: ResourceType = "Claim".parse().unwrap();
//! let claim = json!({"resourceType": "Claim", "status": "draft"});
//! assert_eq!(rt.derive_status(&claim), "draft");
//!
//! let outcome = StructuralValidator::new().validate(&claim);
//! assert!(!outcome.is_valid());
//! ```

#![warn(missing_docs)]

pub mod model;
pub mod outcome;
pub mod resource;
pub mod validation;

pub use outcome::{Issue, IssueSeverity, IssueType};
pub use resource::{ResourceType, UNKNOWN_STATUS, UnsupportedResourceType};
pub use validation::{StructuralValidator, ValidationOutcome, Validator, is_valid_id};

/// The FHIR namespace used by the XML representation.
pub const FHIR_NAMESPACE: &str = "http://hl7.org/fhir";

/// The XHTML namespace used by narrative `div` elements.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
