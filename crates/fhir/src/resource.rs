//! Resource type dispatch.
//!
//! Every storable document kind is a variant of [`ResourceType`]. The enum is
//! the single dispatch point for per-type behaviour: the URL path segment it
//! is parsed from, the element model used to encode and validate it, and the
//! rule used to derive the indexed `status` attribute from document content.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{self, TypeDef};

/// Status recorded for documents that carry no status element.
pub const UNKNOWN_STATUS: &str = "unknown";

/// The document kinds the record service stores and serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    /// A request for adjudication or prior authorization.
    Claim,
    /// The adjudication result for a Claim.
    ClaimResponse,
    /// A collection of resources submitted or returned together.
    Bundle,
}

/// Returned when a path segment does not name a supported resource type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported resource type: {0}")]
pub struct UnsupportedResourceType(pub String);

impl ResourceType {
    /// All supported resource types, in declaration order.
    pub const ALL: [ResourceType; 3] = [
        ResourceType::Claim,
        ResourceType::ClaimResponse,
        ResourceType::Bundle,
    ];

    /// Returns the FHIR name of this resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Claim => "Claim",
            ResourceType::ClaimResponse => "ClaimResponse",
            ResourceType::Bundle => "Bundle",
        }
    }

    /// Returns the element model for this resource type.
    pub fn definition(&self) -> &'static TypeDef {
        match self {
            ResourceType::Claim => &model::CLAIM,
            ResourceType::ClaimResponse => &model::CLAIM_RESPONSE,
            ResourceType::Bundle => &model::BUNDLE,
        }
    }

    /// Derives the indexed status attribute from a document.
    ///
    /// Claim and ClaimResponse carry their own `status`. A Bundle takes the
    /// status of the first entry resource that has one. Documents without a
    /// usable status map to [`UNKNOWN_STATUS`].
    pub fn derive_status(&self, document: &Value) -> String {
        let status = match self {
            ResourceType::Claim | ResourceType::ClaimResponse => top_level_status(document),
            ResourceType::Bundle => document
                .get("entry")
                .and_then(Value::as_array)
                .and_then(|entries| {
                    entries
                        .iter()
                        .filter_map(|entry| entry.get("resource"))
                        .find_map(top_level_status)
                }),
        };

        status.unwrap_or(UNKNOWN_STATUS).to_string()
    }
}

fn top_level_status(document: &Value) -> Option<&str> {
    document
        .get("status")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = UnsupportedResourceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|rt| rt.as_str() == s)
            .ok_or_else(|| UnsupportedResourceType(s.to_string()))
    }
}
