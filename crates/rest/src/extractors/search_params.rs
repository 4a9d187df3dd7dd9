//! Record query extractor.
//!
//! Turns the query string of a record request into store [`Constraints`] and
//! a negotiated response [`Format`].

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use priorauth_persistence::types::{Attribute, Constraints};
use priorauth_serde::Format;
use tracing::debug;

use crate::error::RestError;
use crate::middleware::negotiate_format;

/// Query parameters that map onto record attributes.
pub const RECORD_PARAMETERS: [(&str, Attribute); 3] = [
    ("identifier", Attribute::Id),
    ("patient.identifier", Attribute::Patient),
    ("status", Attribute::Status),
];

/// The format override parameter.
pub const FORMAT_PARAMETER: &str = "_format";

/// Axum extractor for record lookups.
///
/// Recognized parameters become exact-match constraints. Unrecognized
/// parameters are ignored. A recognized parameter given twice, or given an
/// empty value, rejects the request as malformed.
///
/// # Example
///
/// ```rust
/// use axum::http::HeaderMap;
/// use priorauth_rest::extractors::RecordQuery;
///
/// let query = RecordQuery::parse(
///     Some("identifier=minimal&patient.identifier=1&_format=xml"),
///     &HeaderMap::new(),
/// )
/// .unwrap();
/// assert!(query.is_keyed());
/// assert_eq!(query.constraints().id(), Some("minimal"));
/// ```
#[derive(Debug, Clone)]
pub struct RecordQuery {
    constraints: Constraints,
    format: Format,
    raw: Option<String>,
}

impl RecordQuery {
    /// Parses a raw query string, negotiating the format against `headers`.
    pub fn parse(query: Option<&str>, headers: &HeaderMap) -> Result<Self, RestError> {
        let mut constraints = Constraints::new();
        let mut format_param: Option<String> = None;

        for (name, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            if name == FORMAT_PARAMETER {
                format_param.get_or_insert_with(|| value.into_owned());
                continue;
            }

            let Some(attribute) = RECORD_PARAMETERS
                .iter()
                .find(|(param, _)| *param == name)
                .map(|(_, attribute)| *attribute)
            else {
                debug!(parameter = %name, "Ignoring unrecognized parameter");
                continue;
            };

            if value.trim().is_empty() {
                return Err(RestError::malformed(format!(
                    "Parameter '{}' has an empty value",
                    name
                )));
            }

            if constraints.insert(attribute, value.into_owned()).is_some() {
                return Err(RestError::malformed(format!(
                    "Parameter '{}' was given more than once",
                    name
                )));
            }
        }

        Ok(Self {
            constraints,
            format: negotiate_format(headers, format_param.as_deref()),
            raw: query.filter(|q| !q.is_empty()).map(str::to_string),
        })
    }

    /// Returns the constraints built from the recognized parameters.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Returns the negotiated response format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns true when both `identifier` and `patient.identifier` were
    /// given, naming a single record.
    pub fn is_keyed(&self) -> bool {
        self.constraints.id().is_some() && self.constraints.patient().is_some()
    }

    /// Returns the query string as received, if any.
    pub fn query_string(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl<S> FromRequestParts<S> for RecordQuery
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        RecordQuery::parse(parts.uri.query(), &parts.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> Result<RecordQuery, RestError> {
        RecordQuery::parse(Some(query), &HeaderMap::new())
    }

    #[test]
    fn test_recognized_parameters() {
        let query = parse("identifier=minimal&patient.identifier=1&status=active").unwrap();
        assert_eq!(query.constraints().id(), Some("minimal"));
        assert_eq!(query.constraints().patient(), Some("1"));
        assert_eq!(query.constraints().status(), Some("active"));
        assert!(query.is_keyed());
    }

    #[test]
    fn test_owner_only_is_not_keyed() {
        let query = parse("patient.identifier=1").unwrap();
        assert!(!query.is_keyed());
        assert_eq!(query.constraints().patient(), Some("1"));
    }

    #[test]
    fn test_unrecognized_parameters_ignored() {
        let query = parse("patient.identifier=1&_count=10&name=smith").unwrap();
        assert_eq!(query.constraints().iter().count(), 1);
    }

    #[test]
    fn test_percent_decoding() {
        let query = parse("patient.identifier=a%20b&identifier=x%2By").unwrap();
        assert_eq!(query.constraints().patient(), Some("a b"));
        assert_eq!(query.constraints().id(), Some("x+y"));
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let err = parse("patient.identifier=1&patient.identifier=2").unwrap_err();
        assert!(matches!(err, RestError::MalformedInput { .. }));
        assert!(err.to_string().contains("patient.identifier"));
    }

    #[test]
    fn test_empty_value_rejected() {
        let err = parse("identifier=&patient.identifier=1").unwrap_err();
        assert!(matches!(err, RestError::MalformedInput { .. }));
    }

    #[test]
    fn test_format_parameter() {
        let query = parse("patient.identifier=1&_format=xml").unwrap();
        assert_eq!(query.format(), Format::Xml);
        assert_eq!(query.constraints().iter().count(), 1);
    }

    #[test]
    fn test_no_query() {
        let query = RecordQuery::parse(None, &HeaderMap::new()).unwrap();
        assert!(query.constraints().is_empty());
        assert_eq!(query.format(), Format::Json);
        assert!(query.query_string().is_none());
    }
}
