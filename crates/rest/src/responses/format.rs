//! Format-aware response building.
//!
//! Serializes documents through the configured [`Codec`] in the negotiated
//! format.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use priorauth_serde::{Codec, Format};
use serde_json::Value;
use tracing::error;

use crate::error::RestResult;

/// Builds an HTTP response whose body is `content` written in `format`.
///
/// `headers` should already carry the matching `Content-Type`.
pub fn format_resource_response(
    codec: &dyn Codec,
    status: StatusCode,
    headers: HeaderMap,
    content: &Value,
    format: Format,
) -> RestResult<Response> {
    let body = codec.serialize(content, format).map_err(|e| {
        error!(format = %format, error = %e, "Failed to serialize response");
        e
    })?;

    Ok((status, headers, body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use priorauth_serde::FhirCodec;
    use serde_json::json;

    use crate::responses::ResourceHeaders;

    #[tokio::test]
    async fn test_xml_body() {
        let claim = json!({"resourceType": "Claim", "id": "minimal", "status": "active"});
        let response = format_resource_response(
            &FhirCodec::new(),
            StatusCode::OK,
            ResourceHeaders::new(Format::Xml).to_header_map(),
            &claim,
            Format::Xml,
        )
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains(r#"<Claim xmlns="http://hl7.org/fhir">"#));
        assert!(body.contains(r#"<id value="minimal"/>"#));
    }

    #[test]
    fn test_serialization_error_maps_to_rest_error() {
        let not_a_resource = json!(["no", "resourceType"]);
        let err = format_resource_response(
            &FhirCodec::new(),
            StatusCode::OK,
            HeaderMap::new(),
            &not_a_resource,
            Format::Xml,
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::RestError::Serialization { .. }));
    }
}
