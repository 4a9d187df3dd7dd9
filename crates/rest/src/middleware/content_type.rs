//! Content negotiation.
//!
//! Chooses the response format for a request. Precedence is the `_format`
//! query parameter, then the `Accept` header, then JSON.

use axum::http::{HeaderMap, header};
use priorauth_serde::Format;

/// Determines the response format from the `_format` query parameter and
/// the Accept header.
///
/// Supported `_format` values:
/// - `json`, `application/json`, `application/fhir+json`
/// - `xml`, `application/xml`, `application/fhir+xml`
///
/// An unrecognized `_format` value is ignored.
pub fn negotiate_format(headers: &HeaderMap, format_param: Option<&str>) -> Format {
    if let Some(format) = format_param.and_then(Format::from_format_param) {
        return format;
    }

    negotiate_accept(headers)
}

/// Determines the response format from the Accept header alone.
///
/// Media types are taken in order of appearance; quality values are not
/// weighed. Wildcards and unknown types resolve to JSON.
pub fn negotiate_accept(headers: &HeaderMap) -> Format {
    let Some(accept) = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
    else {
        return Format::Json;
    };

    for media_type in accept.split(',') {
        let media_type = media_type.trim();

        if let Some(format) = Format::from_mime_type(media_type) {
            return format;
        }

        let essence = media_type.split(';').next().unwrap_or_default().trim();
        if essence == "*/*" || essence == "application/*" {
            return Format::Json;
        }
    }

    Format::Json
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_default_is_json() {
        assert_eq!(negotiate_format(&HeaderMap::new(), None), Format::Json);
    }

    #[test]
    fn test_accept_header() {
        assert_eq!(
            negotiate_format(&accept("application/fhir+xml"), None),
            Format::Xml
        );
        assert_eq!(
            negotiate_format(&accept("application/xml;q=0.9, */*;q=0.1"), None),
            Format::Xml
        );
        assert_eq!(
            negotiate_format(&accept("text/html, */*"), None),
            Format::Json
        );
        assert_eq!(negotiate_format(&accept("image/png"), None), Format::Json);
    }

    #[test]
    fn test_format_param_wins() {
        let headers = accept("application/fhir+json");
        assert_eq!(negotiate_format(&headers, Some("xml")), Format::Xml);
        assert_eq!(
            negotiate_format(&headers, Some("application/fhir+xml")),
            Format::Xml
        );
        assert_eq!(
            negotiate_format(&accept("application/fhir+xml"), Some("json")),
            Format::Json
        );
    }

    #[test]
    fn test_unknown_format_param_falls_back() {
        assert_eq!(
            negotiate_format(&accept("application/fhir+xml"), Some("yaml")),
            Format::Xml
        );
    }
}
