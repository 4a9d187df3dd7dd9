//! XML serialization and deserialization for FHIR resources.
//!
//! Converts between FHIR JSON documents (`serde_json::Value`) and FHIR XML.
//! The static element model from `priorauth-fhir` supplies what the JSON
//! alone does not: element order, which elements repeat, and the primitive
//! type behind each `value` attribute.
//!
//! ## FHIR JSON ↔ XML Mapping
//!
//! | JSON Pattern | XML Pattern |
//! |--------------|-------------|
//! | `{"status": "active"}` | `<status value="active"/>` |
//! | `{"focal": true}` | `<focal value="true"/>` |
//! | `{"status": "active", "_status": {"id": "s1"}}` | `<status id="s1" value="active"/>` |
//! | `{"item": [{..}, {..}]}` | `<item>..</item><item>..</item>` |
//! | `{"seq": [1, null], "_seq": [null, {"id": "a"}]}` | `<seq value="1"/><seq id="a"/>` |
//! | `{"patient": {"id": "p", ..}}` | `<patient id="p">..</patient>` |
//! | `{"extension": [{"url": "u", ..}]}` | `<extension url="u">..</extension>` |
//! | `{"resource": {"resourceType": "Claim", ..}}` | `<resource><Claim>..</Claim></resource>` |
//!
//! ## Special Attributes
//!
//! - **`value`**: The primitive value of an element
//! - **`id`**: Element identifier on datatypes and backbone elements (from `_field` on primitives)
//! - **`url`**: The extension URL
//!
//! All other data is represented as child elements.
//!
//! ## Namespace Handling
//!
//! - FHIR namespace (`http://hl7.org/fhir`) is added to the root resource element
//! - Narrative `div` elements keep their XHTML namespace and are copied verbatim
//!   in both directions
//!
//! ## Examples
//!
//! ```
//! use priorauth_serde::xml::{from_xml_str, to_xml_string};
//! use serde_json::json;
//!
//! let claim = json!({"resourceType": "Claim", "id": "example", "status": "active"});
//! let xml = to_xml_string(&claim).unwrap();
//! assert!(xml.contains(r#"<status value="active"/>"#));
//! assert_eq!(from_xml_str(&xml).unwrap(), claim);
//! ```

pub mod de;
pub mod ser;
mod utils;

// Re-export serialization functions
pub use ser::{to_xml_string, to_xml_string_pretty, to_xml_vec, to_xml_writer};

// Re-export deserialization functions
pub use de::{from_xml_slice, from_xml_str};
