//! Utility functions shared by the XML reader and writer.

use serde_json::{Map, Value};

use crate::error::{Result, SerdeError};

/// Splits a resource document into its `resourceType` and its object body.
pub fn resource_parts(resource: &Value) -> Result<(&str, &Map<String, Value>)> {
    let obj = resource
        .as_object()
        .ok_or_else(|| SerdeError::Custom("a FHIR resource must be a JSON object".to_string()))?;
    let name = obj
        .get("resourceType")
        .and_then(Value::as_str)
        .ok_or_else(|| SerdeError::Custom("resource has no resourceType".to_string()))?;
    Ok((name, obj))
}

/// Checks if an element name represents a FHIR resource.
///
/// FHIR resources are identified by having an uppercase first letter.
pub fn is_resource_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Checks if an element name is the narrative `div`.
pub fn is_div_element(name: &str) -> bool {
    name == "div"
}

/// Renders a JSON primitive as the text of an XML `value` attribute.
pub fn primitive_text(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(bool_to_string(*b).to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(SerdeError::Custom(format!(
            "element '{name}' is not a primitive value"
        ))),
    }
}

/// Converts a Rust boolean to its string representation for XML.
pub fn bool_to_string(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}
