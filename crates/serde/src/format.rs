//! Wire formats.

use std::fmt;

/// The FHIR wire formats the service speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// `application/fhir+json`
    #[default]
    Json,
    /// `application/fhir+xml`
    Xml,
}

impl Format {
    /// Returns the MIME type used in `Content-Type` for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::Json => "application/fhir+json",
            Format::Xml => "application/fhir+xml",
        }
    }

    /// Parses a MIME type, ignoring parameters such as `charset` or `fhirVersion`.
    ///
    /// Accepts the FHIR types as well as the generic JSON and XML types.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/fhir+json" | "application/json" | "application/json+fhir" => {
                Some(Format::Json)
            }
            "application/fhir+xml" | "application/xml" | "application/xml+fhir" | "text/xml" => {
                Some(Format::Xml)
            }
            _ => None,
        }
    }

    /// Parses a `_format` query parameter value (`json`, `xml`, or a MIME type).
    pub fn from_format_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "xml" => Some(Format::Xml),
            other => Self::from_mime_type(other),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}
