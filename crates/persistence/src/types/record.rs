//! Stored record types.
//!
//! A [`Record`] is a clinical document together with the attributes the store
//! indexes it by. The `status` attribute is always derived from the document
//! when the record is built; there is no way to supply it directly.

use chrono::{DateTime, Utc};
use priorauth_fhir::ResourceType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::constraints::Attribute;

/// A stored document with its indexed attributes.
///
/// Records handed out by a store are copies; mutating one never affects the
/// stored version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    resource_type: ResourceType,
    id: String,
    patient: String,
    status: String,
    document: Value,
    timestamp: DateTime<Utc>,
}

impl Record {
    /// Builds a record, deriving `status` from the document.
    pub(crate) fn new(
        resource_type: ResourceType,
        id: String,
        patient: String,
        document: Value,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let status = resource_type.derive_status(&document);
        Self {
            resource_type,
            id,
            patient,
            status,
            document,
            timestamp,
        }
    }

    /// Returns the resource type.
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Returns the record identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the owning patient reference.
    pub fn patient(&self) -> &str {
        &self.patient
    }

    /// Returns the status derived from the document.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the stored document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Consumes the record and returns its document.
    pub fn into_document(self) -> Value {
        self.document
    }

    /// Returns when this version of the record was written.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the value of an indexed attribute.
    pub fn attribute(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::Id => &self.id,
            Attribute::Patient => &self.patient,
            Attribute::Status => &self.status,
        }
    }
}

/// Input to a store write.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// Record identifier.
    pub id: String,
    /// Owning patient reference.
    pub patient: String,
    /// The document to store.
    pub resource: Value,
}

impl NewRecord {
    /// Creates write input for the given key and document.
    pub fn new(id: impl Into<String>, patient: impl Into<String>, resource: Value) -> Self {
        Self {
            id: id.into(),
            patient: patient.into(),
            resource,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_is_derived() {
        let record = Record::new(
            ResourceType::Claim,
            "minimal".to_string(),
            "1".to_string(),
            json!({"resourceType": "Claim", "status": "active"}),
            Utc::now(),
        );
        assert_eq!(record.status(), "active");
        assert_eq!(record.attribute(Attribute::Status), "active");
        assert_eq!(record.attribute(Attribute::Patient), "1");
    }

    #[test]
    fn test_bundle_status_without_entries() {
        let record = Record::new(
            ResourceType::Bundle,
            "b".to_string(),
            "1".to_string(),
            json!({"resourceType": "Bundle", "type": "collection"}),
            Utc::now(),
        );
        assert_eq!(record.status(), "unknown");
    }
}
