//! JSON serialization wrapper functions for FHIR resources.
//!
//! Thin wrappers around `serde_json` that check the document is a resource
//! (an object carrying a `resourceType`) on the way in.
use serde_json::Value;

use crate::error::{Result, SerdeError};

/// Deserialize a FHIR resource from a JSON string.
///
/// # Examples
///
/// ```
/// use priorauth_serde::json::from_json_str;
///
/// let claim = from_json_str(r#"{"resourceType": "Claim", "id": "example"}"#).unwrap();
/// assert_eq!(claim["id"], "example");
/// ```
pub fn from_json_str(s: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(s)?;
    match value.get("resourceType").and_then(Value::as_str) {
        Some(_) => Ok(value),
        None => Err(SerdeError::Custom(
            "JSON document is not a FHIR resource: missing resourceType".to_string(),
        )),
    }
}

/// Serialize a FHIR resource to a JSON string.
pub fn to_json_string(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Serialize a FHIR resource to a pretty-printed JSON string.
pub fn to_json_string_pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
