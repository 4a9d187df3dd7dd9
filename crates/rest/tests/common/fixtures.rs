//! Test documents.

use serde_json::{Value, json};

/// The `minimal` Claim owned by patient `1`.
pub fn claim_minimal() -> Value {
    serde_json::from_str(include_str!("../fixtures/claim-minimal.json"))
        .expect("claim-minimal.json is valid JSON")
}

/// A copy of the `minimal` Claim under another id and status.
pub fn claim_variant(id: &str, status: &str) -> Value {
    let mut claim = claim_minimal();
    claim["id"] = json!(id);
    claim["status"] = json!(status);
    claim
}

/// A ClaimResponse approving the `minimal` Claim.
pub fn claim_response(id: &str) -> Value {
    json!({
        "resourceType": "ClaimResponse",
        "id": id,
        "status": "active",
        "type": {"coding": [{"system": "http://terminology.hl7.org/CodeSystem/claim-type", "code": "professional"}]},
        "use": "preauthorization",
        "patient": {"reference": "Patient/1"},
        "created": "2024-03-02T10:00:00-05:00",
        "insurer": {"reference": "Organization/payer-1"},
        "request": {"reference": "Claim/minimal"},
        "outcome": "complete",
        "preAuthRef": "AUTH-0001"
    })
}

/// A Claim that stores fine but fails structural validation.
pub fn claim_missing_required() -> Value {
    json!({
        "resourceType": "Claim",
        "id": "broken",
        "status": "active"
    })
}
