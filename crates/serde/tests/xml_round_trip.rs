//! JSON → XML → JSON round trips over realistic prior authorization documents.

use priorauth_serde::{Codec, FhirCodec, Format};
use serde_json::{Value, json};

fn prior_auth_claim() -> Value {
    json!({
        "resourceType": "Claim",
        "id": "minimal",
        "meta": {"lastUpdated": "2019-07-20T11:01:00+05:00", "profile": ["http://hl7.org/fhir/us/davinci-pas/StructureDefinition/profile-claim"]},
        "text": {
            "status": "generated",
            "div": "<div xmlns=\"http://www.w3.org/1999/xhtml\"><p>Prior authorization &amp; review</p></div>"
        },
        "extension": [{
            "url": "http://example.org/fhir/StructureDefinition/levelOfServiceCode",
            "valueCodeableConcept": {"coding": [{"system": "http://example.org/los", "code": "U"}]}
        }],
        "identifier": [{"system": "http://example.org/claims", "value": "minimal"}],
        "status": "active",
        "_status": {"id": "st"},
        "type": {"coding": [{"system": "http://terminology.hl7.org/CodeSystem/claim-type", "code": "professional"}]},
        "use": "preauthorization",
        "patient": {"reference": "Patient/1"},
        "created": "2019-07-20T11:01:00+05:00",
        "provider": {"reference": "Organization/1"},
        "priority": {"coding": [{"code": "normal"}]},
        "supportingInfo": [{
            "sequence": 1,
            "category": {"text": "additional"},
            "timingDate": "2019-07-20",
            "valueQuantity": {"value": 12.5, "unit": "mg"}
        }],
        "insurance": [{"sequence": 1, "focal": true, "coverage": {"reference": "Coverage/1"}}],
        "item": [{
            "sequence": 1,
            "careTeamSequence": [1, 2],
            "productOrService": {"coding": [{"code": "99214"}]},
            "quantity": {"value": 1},
            "unitPrice": {"value": 135.57, "currency": "USD"},
            "factor": 0.75
        }],
        "total": {"value": 135.57, "currency": "USD"}
    })
}

fn claim_response() -> Value {
    json!({
        "resourceType": "ClaimResponse",
        "id": "resp-1",
        "status": "active",
        "type": {"coding": [{"code": "professional"}]},
        "use": "preauthorization",
        "patient": {"reference": "Patient/1"},
        "created": "2019-07-20T11:02:00+05:00",
        "insurer": {"reference": "Organization/2"},
        "outcome": "complete",
        "preAuthRef": "AUTH-1",
        "item": [{
            "itemSequence": 1,
            "adjudication": [{"category": {"text": "submitted"}, "amount": {"value": 100, "currency": "USD"}}]
        }]
    })
}

fn round_trip(value: &Value) -> Value {
    let codec = FhirCodec::new();
    let xml = codec.serialize(value, Format::Xml).unwrap();
    codec.deserialize(&xml, Format::Xml).unwrap()
}

#[test]
fn test_claim_round_trip() {
    let claim = prior_auth_claim();
    assert_eq!(round_trip(&claim), claim);
}

#[test]
fn test_claim_response_round_trip() {
    let response = claim_response();
    assert_eq!(round_trip(&response), response);
}

#[test]
fn test_searchset_bundle_round_trip() {
    let bundle = json!({
        "resourceType": "Bundle",
        "id": "0b7e4ab4-1f43-4d4c-9d2e-7b0d4c1a6f11",
        "meta": {"lastUpdated": "2019-07-20T11:05:00+00:00"},
        "type": "searchset",
        "total": 2,
        "link": [{"relation": "self", "url": "http://localhost:8080/Claim?patient.identifier=1"}],
        "entry": [
            {"fullUrl": "http://localhost:8080/Claim/minimal", "resource": prior_auth_claim(), "search": {"mode": "match"}},
            {"fullUrl": "http://localhost:8080/ClaimResponse/resp-1", "resource": claim_response(), "search": {"mode": "match"}}
        ]
    });
    assert_eq!(round_trip(&bundle), bundle);
}

#[test]
fn test_pretty_xml_round_trip() {
    let codec = FhirCodec::pretty();
    let claim = prior_auth_claim();
    let xml = codec.serialize(&claim, Format::Xml).unwrap();
    assert!(xml.lines().count() > 10);
    assert_eq!(codec.deserialize(&xml, Format::Xml).unwrap(), claim);
}

#[test]
fn test_json_round_trip() {
    let codec = FhirCodec::new();
    let claim = prior_auth_claim();
    let body = codec.serialize(&claim, Format::Json).unwrap();
    assert_eq!(codec.deserialize(&body, Format::Json).unwrap(), claim);
}

#[test]
fn test_xml_shape() {
    let xml = FhirCodec::new()
        .serialize(&prior_auth_claim(), Format::Xml)
        .unwrap();
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><Claim xmlns="http://hl7.org/fhir">"#));
    assert!(xml.contains(r#"<status id="st" value="active"/>"#));
    assert!(xml.contains(r#"<extension url="http://example.org/fhir/StructureDefinition/levelOfServiceCode">"#));
    assert!(xml.contains(r#"<factor value="0.75"/>"#));
    assert!(xml.ends_with("</Claim>"));
}

#[test]
fn test_claim_item_detail_round_trip() {
    let mut claim = prior_auth_claim();
    claim["item"][0]["detail"] = json!([{
        "sequence": 1,
        "productOrService": {"coding": [{"system": "http://www.ama-assn.org/go/cpt", "code": "E0424"}]},
        "modifier": [{"coding": [{"code": "NU"}]}],
        "quantity": {"value": 1},
        "subDetail": [
            {"sequence": 1, "productOrService": {"text": "regulator"}, "factor": 1.5},
            {"sequence": 2, "productOrService": {"text": "tubing"}, "udi": [{"reference": "Device/d1"}]}
        ]
    }]);
    assert_eq!(round_trip(&claim), claim);
}

#[test]
fn test_claim_response_full_round_trip() {
    let mut response = claim_response();
    let adjudication = json!([{"category": {"text": "eligible"}, "amount": {"value": 80.25, "currency": "USD"}, "value": 0.8}]);
    response["item"][0]["detail"] = json!([{
        "detailSequence": 1,
        "noteNumber": [1],
        "adjudication": adjudication.clone(),
        "subDetail": [{"subDetailSequence": 1, "adjudication": adjudication.clone()}]
    }]);
    response["addItem"] = json!([{
        "itemSequence": [1],
        "provider": [{"reference": "Practitioner/p1"}],
        "productOrService": {"text": "follow-up"},
        "servicedDate": "2019-08-01",
        "adjudication": adjudication.clone(),
        "detail": [{
            "productOrService": {"text": "visit"},
            "adjudication": adjudication.clone(),
            "subDetail": [{"productOrService": {"text": "lab"}, "adjudication": adjudication.clone()}]
        }]
    }]);
    response["adjudication"] = adjudication;
    response["payment"] = json!({
        "type": {"text": "complete"},
        "date": "2019-08-02",
        "amount": {"value": 80.25, "currency": "USD"}
    });
    response["form"] = json!({"contentType": "application/pdf", "size": 2048, "title": "decision letter"});
    response["communicationRequest"] = json!([{"reference": "CommunicationRequest/c1"}]);
    response["insurance"] = json!([{"sequence": 1, "focal": true, "coverage": {"reference": "Coverage/1"}}]);

    assert_eq!(round_trip(&response), response);
}

#[test]
fn test_submission_bundle_round_trip() {
    let bundle = json!({
        "resourceType": "Bundle",
        "id": "submission",
        "type": "collection",
        "timestamp": "2019-07-20T11:01:00+05:00",
        "entry": [
            {"fullUrl": "urn:uuid:claim", "resource": prior_auth_claim()},
            {"fullUrl": "urn:uuid:patient", "resource": {
                "resourceType": "Patient",
                "id": "1",
                "active": true,
                "name": [{"use": "official", "family": "Doe", "given": ["Jane", "Q"]}],
                "telecom": [{"system": "phone", "value": "555-0100", "rank": 1}],
                "gender": "female",
                "birthDate": "1970-01-01",
                "deceasedBoolean": false,
                "address": [{"line": ["1 Main St"], "city": "Springfield", "state": "MA"}],
                "communication": [{"language": {"text": "English"}, "preferred": true}]
            }},
            {"fullUrl": "urn:uuid:coverage", "resource": {
                "resourceType": "Coverage",
                "id": "1",
                "status": "active",
                "subscriberId": "A123",
                "beneficiary": {"reference": "Patient/1"},
                "payor": [{"reference": "Organization/payer-1"}],
                "class": [{"type": {"text": "plan"}, "value": "gold"}],
                "order": 1,
                "costToBeneficiary": [{"valueMoney": {"value": 20, "currency": "USD"}}],
                "subrogation": false
            }},
            {"fullUrl": "urn:uuid:org", "resource": {
                "resourceType": "Organization",
                "id": "payer-1",
                "active": true,
                "name": "Example Payer",
                "alias": ["EP"],
                "contact": [{"name": {"family": "Smith"}, "telecom": [{"system": "email", "value": "pa@example.org"}]}]
            }},
            {"fullUrl": "urn:uuid:practitioner", "resource": {
                "resourceType": "Practitioner",
                "id": "p1",
                "name": [{"family": "Jones", "prefix": ["Dr."]}],
                "qualification": [{"code": {"text": "MD"}}]
            }},
            {"fullUrl": "urn:uuid:role", "resource": {
                "resourceType": "PractitionerRole",
                "id": "r1",
                "practitioner": {"reference": "Practitioner/p1"},
                "availableTime": [{"daysOfWeek": ["mon", "tue"], "allDay": true}]
            }}
        ]
    });
    assert_eq!(round_trip(&bundle), bundle);
}

#[test]
fn test_unmodelled_content_fails_instead_of_guessing() {
    let codec = FhirCodec::new();

    let mut claim = prior_auth_claim();
    claim["item"][0]["unknownDetail"] = json!([{"sequence": 1}]);
    let xml = codec.serialize(&claim, Format::Xml).unwrap();
    assert!(codec.deserialize(&xml, Format::Xml).is_err());

    let bundle = json!({
        "resourceType": "Bundle",
        "type": "collection",
        "entry": [{"resource": {"resourceType": "Observation", "status": "final", "valueBoolean": true}}]
    });
    let xml = codec.serialize(&bundle, Format::Xml).unwrap();
    assert!(codec.deserialize(&xml, Format::Xml).is_err());
}
