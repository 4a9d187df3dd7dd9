//! The codec seam between the request pipeline and the wire formats.

use serde_json::Value;

use crate::error::Result;
use crate::format::Format;
use crate::{json, xml};

/// Converts resource documents to and from a wire format.
pub trait Codec: Send + Sync {
    /// Serializes a resource document.
    fn serialize(&self, resource: &Value, format: Format) -> Result<String>;

    /// Parses a resource document.
    fn deserialize(&self, body: &str, format: Format) -> Result<Value>;
}

/// FHIR JSON and XML codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct FhirCodec {
    pretty: bool,
}

impl FhirCodec {
    /// Creates a codec producing compact output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec producing indented output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for FhirCodec {
    fn serialize(&self, resource: &Value, format: Format) -> Result<String> {
        match (format, self.pretty) {
            (Format::Json, false) => json::to_json_string(resource),
            (Format::Json, true) => json::to_json_string_pretty(resource),
            (Format::Xml, false) => xml::to_xml_string(resource),
            (Format::Xml, true) => xml::to_xml_string_pretty(resource),
        }
    }

    fn deserialize(&self, body: &str, format: Format) -> Result<Value> {
        match format {
            Format::Json => json::from_json_str(body),
            Format::Xml => xml::from_xml_str(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dispatch_by_format() {
        let codec = FhirCodec::new();
        let claim = json!({"resourceType": "Claim", "id": "a"});

        let body = codec.serialize(&claim, Format::Json).unwrap();
        assert!(body.starts_with('{'));

        let body = codec.serialize(&claim, Format::Xml).unwrap();
        assert!(body.starts_with("<?xml"));
    }

    #[test]
    fn test_codec_is_object_safe() {
        let codec: Box<dyn Codec> = Box::new(FhirCodec::pretty());
        let claim = json!({"resourceType": "Claim", "id": "a"});
        let body = codec.serialize(&claim, Format::Json).unwrap();
        assert_eq!(codec.deserialize(&body, Format::Json).unwrap(), claim);
    }
}
