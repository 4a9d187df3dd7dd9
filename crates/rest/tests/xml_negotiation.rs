//! Content negotiation tests.
//!
//! Responses are FHIR XML when `_format` or `Accept` asks for it. The
//! `_format` parameter wins over the header; error outcomes stay JSON.

mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use priorauth_fhir::ResourceType;
use priorauth_serde::{Codec, FhirCodec, Format};
use serde_json::Value;

use common::fixtures::claim_response;
use common::harness::{BASE_URL, seed, seeded_server};

const FHIR_XML: &str = "application/fhir+xml";
const FHIR_JSON: &str = "application/fhir+json";

fn accept(value: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("accept"),
        HeaderValue::from_static(value),
    )
}

fn parse_xml(body: &str) -> Value {
    FhirCodec::new()
        .deserialize(body, Format::Xml)
        .expect("response body is FHIR XML")
}

#[tokio::test]
async fn test_fetch_as_xml_via_format_param() {
    let (server, _backend) = seeded_server().await;

    let response = server
        .get("/Claim?identifier=minimal&patient.identifier=1&_format=xml")
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), FHIR_XML);
    assert_eq!(response.header("access-control-allow-origin"), "*");

    let body = response.text();
    assert!(body.starts_with("<?xml"));
    assert!(body.contains(r#"<Claim xmlns="http://hl7.org/fhir">"#));

    let claim = parse_xml(&body);
    assert_eq!(claim["resourceType"], "Claim");
    assert_eq!(claim["id"], "minimal");
    assert_eq!(claim["status"], "active");
    assert_eq!(claim["patient"]["reference"], "Patient/1");
    assert!(claim["insurance"].is_array());
    assert_eq!(claim["insurance"][0]["focal"], true);
}

#[tokio::test]
async fn test_fetch_as_xml_via_mime_format_param() {
    let (server, _backend) = seeded_server().await;

    let response = server
        .get("/Claim?identifier=minimal&patient.identifier=1&_format=application/fhir%2Bxml")
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), FHIR_XML);
}

#[tokio::test]
async fn test_fetch_as_xml_via_accept_header() {
    let (server, _backend) = seeded_server().await;
    let (name, value) = accept("application/fhir+xml");

    let response = server
        .get("/Claim?identifier=minimal&patient.identifier=1")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), FHIR_XML);
    assert_eq!(parse_xml(&response.text())["id"], "minimal");
}

#[tokio::test]
async fn test_format_param_wins_over_accept() {
    let (server, _backend) = seeded_server().await;
    let (name, value) = accept("application/fhir+xml");

    let response = server
        .get("/Claim?identifier=minimal&patient.identifier=1&_format=json")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), FHIR_JSON);
    let claim: Value = response.json();
    assert_eq!(claim["id"], "minimal");
}

#[tokio::test]
async fn test_wildcard_accept_defaults_to_json() {
    let (server, _backend) = seeded_server().await;
    let (name, value) = accept("*/*");

    let response = server
        .get("/Claim?identifier=minimal&patient.identifier=1")
        .add_header(name, value)
        .await;

    assert_eq!(response.header("content-type"), FHIR_JSON);
}

#[tokio::test]
async fn test_unknown_format_param_is_ignored() {
    let (server, _backend) = seeded_server().await;
    let (name, value) = accept("application/xml");

    let response = server
        .get("/Claim?identifier=minimal&patient.identifier=1&_format=turtle")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), FHIR_XML);
}

#[tokio::test]
async fn test_search_as_xml() {
    let (server, backend) = seeded_server().await;
    seed(&backend, ResourceType::ClaimResponse, "1", claim_response("resp-1")).await;

    let response = server
        .get("/ClaimResponse?patient.identifier=1&_format=xml")
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), FHIR_XML);

    let bundle = parse_xml(&response.text());
    assert_eq!(bundle["resourceType"], "Bundle");
    assert_eq!(bundle["type"], "searchset");
    assert_eq!(bundle["total"], 1);
    assert_eq!(
        bundle["entry"][0]["fullUrl"],
        format!("{BASE_URL}/ClaimResponse?identifier=resp-1&patient.identifier=1")
    );
    assert_eq!(bundle["entry"][0]["resource"]["resourceType"], "ClaimResponse");
    assert_eq!(bundle["entry"][0]["resource"]["preAuthRef"], "AUTH-0001");
}

#[tokio::test]
async fn test_not_found_outcome_stays_json() {
    let (server, _backend) = seeded_server().await;

    let response = server
        .get("/Claim?identifier=ClaimThatDoesNotExist&patient.identifier=45&_format=xml")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.header("content-type"), FHIR_JSON);
    let outcome: Value = response.json();
    assert_eq!(outcome["resourceType"], "OperationOutcome");
    assert_eq!(outcome["issue"][0]["code"], "not-found");
}

#[tokio::test]
async fn test_delete_outcome_as_xml() {
    let (server, _backend) = seeded_server().await;

    let response = server
        .delete("/Claim?identifier=minimal&patient.identifier=1&_format=xml")
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), FHIR_XML);
    let outcome = parse_xml(&response.text());
    assert_eq!(outcome["resourceType"], "OperationOutcome");
    assert_eq!(outcome["issue"][0]["severity"], "information");
}
