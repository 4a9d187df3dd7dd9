//! Test fixtures for record store testing.

use serde_json::{Value, json};

/// A claim fixture for testing.
#[derive(Debug, Clone)]
pub struct ClaimFixture {
    /// Claim ID.
    pub id: String,
    /// Owning patient.
    pub patient: String,
    /// Claim status.
    pub status: String,
    /// Claim use.
    pub use_: String,
}

impl ClaimFixture {
    /// Creates an active preauthorization claim.
    pub fn new(id: impl Into<String>, patient: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            patient: patient.into(),
            status: "active".to_string(),
            use_: "preauthorization".to_string(),
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Builds the Claim document.
    pub fn build(&self) -> Value {
        json!({
            "resourceType": "Claim",
            "id": self.id,
            "status": self.status,
            "type": {"coding": [{"system": "http://terminology.hl7.org/CodeSystem/claim-type", "code": "professional"}]},
            "use": self.use_,
            "patient": {"reference": format!("Patient/{}", self.patient)},
            "created": "2019-07-20T11:01:00+05:00",
            "provider": {"reference": "Organization/1"},
            "priority": {"coding": [{"code": "normal"}]},
            "insurance": [{"sequence": 1, "focal": true, "coverage": {"reference": "Coverage/1"}}]
        })
    }
}

/// A bundle wrapping a single claim, as submitted for prior authorization.
pub fn submission_bundle(claim: &ClaimFixture) -> Value {
    json!({
        "resourceType": "Bundle",
        "id": format!("bundle-{}", claim.id),
        "type": "collection",
        "entry": [
            {"resource": {"resourceType": "Patient", "id": claim.patient}},
            {"resource": claim.build()}
        ]
    })
}
