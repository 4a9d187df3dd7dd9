//! FHIR XML deserialization.
//!
//! Parsing happens in two passes. quick-xml events are first collected into a
//! small element tree (narrative `div` content is captured verbatim), which is
//! then converted to FHIR JSON with the element model deciding which elements
//! are arrays and which primitives are booleans or numbers. Content the model
//! does not describe (an unknown resource type, element, or attribute) is an
//! error; decoding never guesses at a shape.

use priorauth_fhir::model::{self, ElementKind, TypeDef};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

use super::utils;
use crate::error::{Result, SerdeError};

/// Deserialize a FHIR resource from an XML string.
pub fn from_xml_str(xml: &str) -> Result<Value> {
    let root = parse_tree(xml)?;
    if !utils::is_resource_name(&root.name) {
        return Err(SerdeError::Custom(format!(
            "root element '{}' is not a FHIR resource",
            root.name
        )));
    }
    resource_to_json(&root)
}

/// Deserialize a FHIR resource from XML bytes.
pub fn from_xml_slice(bytes: &[u8]) -> Result<Value> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| SerdeError::Custom(format!("XML input is not valid UTF-8: {}", e)))?;
    from_xml_str(xml)
}

#[derive(Debug, Default)]
struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    /// Verbatim markup of a narrative `div`.
    xhtml: Option<String>,
}

impl XmlElement {
    fn from_start(e: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr
                .map_err(|e| SerdeError::Custom(format!("Failed to parse attribute: {}", e)))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            // Skip xmlns namespace declarations
            if key.starts_with("xmlns") {
                continue;
            }
            let raw = String::from_utf8_lossy(&attr.value);
            let value = quick_xml::escape::unescape(&raw)
                .map_err(|e| SerdeError::Custom(format!("invalid value for '{}': {}", key, e)))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            ..Default::default()
        })
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Children grouped by name, in order of first appearance.
    fn grouped_children(&self) -> Vec<(&str, Vec<&XmlElement>)> {
        let mut groups: Vec<(&str, Vec<&XmlElement>)> = Vec::new();
        for child in &self.children {
            match groups.iter_mut().find(|(name, _)| *name == child.name) {
                Some((_, members)) => members.push(child),
                None => groups.push((child.name.as_str(), vec![child])),
            }
        }
        groups
    }
}

fn parse_tree(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let complete = match event {
            Event::Start(e) if e.local_name().as_ref() == b"div" => {
                let end = e.to_end().into_owned();
                reader.read_to_end(end.name())?;
                let mut div = XmlElement::from_start(&e)?;
                div.xhtml = Some(raw_markup(xml, before, reader.buffer_position() as usize)?);
                Some(div)
            }
            Event::Empty(e) if e.local_name().as_ref() == b"div" => {
                let mut div = XmlElement::from_start(&e)?;
                div.xhtml = Some(raw_markup(xml, before, reader.buffer_position() as usize)?);
                Some(div)
            }
            Event::Start(e) => {
                stack.push(XmlElement::from_start(&e)?);
                None
            }
            Event::Empty(e) => Some(XmlElement::from_start(&e)?),
            Event::End(_) => stack.pop(),
            Event::Eof => break,
            _ => None,
        };

        if let Some(element) = complete {
            match stack.last_mut() {
                Some(parent) => parent.children.push(element),
                None if root.is_none() => root = Some(element),
                None => {
                    return Err(SerdeError::Custom(
                        "XML document has more than one root element".to_string(),
                    ));
                }
            }
        }
    }

    if !stack.is_empty() {
        return Err(SerdeError::Custom("XML document ended unexpectedly".to_string()));
    }
    root.ok_or_else(|| SerdeError::Custom("XML document has no root element".to_string()))
}

fn raw_markup(xml: &str, start: usize, end: usize) -> Result<String> {
    xml.get(start..end)
        .map(|markup| markup.trim().to_string())
        .ok_or_else(|| SerdeError::Custom("narrative div spans an invalid range".to_string()))
}

fn resource_to_json(element: &XmlElement) -> Result<Value> {
    let def = model::resource(&element.name).ok_or_else(|| {
        SerdeError::Custom(format!(
            "resource type '{}' is not described by the element model",
            element.name
        ))
    })?;
    let mut map = Map::new();
    map.insert("resourceType".to_string(), Value::String(element.name.clone()));
    children_to_json(def, element, &mut map)?;
    Ok(Value::Object(map))
}

/// Converts an element's attributes and children into properties of `map`.
fn children_to_json(
    def: &'static TypeDef,
    element: &XmlElement,
    map: &mut Map<String, Value>,
) -> Result<()> {
    for (key, value) in &element.attributes {
        match def.element(key) {
            Some(attr) if attr.attribute => {
                map.insert(key.clone(), Value::String(value.clone()));
            }
            _ => return Err(unknown_content(def, key, "attribute")),
        }
    }
    child_elements_to_json(def, element, map)
}

/// Converts child elements into properties of `map`, using `def` to decide
/// which repeat and how primitives are typed.
fn child_elements_to_json(
    def: &'static TypeDef,
    element: &XmlElement,
    map: &mut Map<String, Value>,
) -> Result<()> {
    for (name, members) in element.grouped_children() {
        let element_def = def
            .element(name)
            .filter(|e| !e.attribute)
            .ok_or_else(|| unknown_content(def, name, "element"))?;

        let mut values = Vec::with_capacity(members.len());
        let mut extensions = Vec::with_capacity(members.len());
        for member in &members {
            let (value, ext) = element_to_json(element_def.kind, member)?;
            values.push(value);
            extensions.push(ext);
        }

        if element_def.repeating {
            if values.iter().any(Option::is_some) {
                let array = values.into_iter().map(|v| v.unwrap_or(Value::Null)).collect();
                map.insert(name.to_string(), Value::Array(array));
            }
            if extensions.iter().any(Option::is_some) {
                let array = extensions
                    .into_iter()
                    .map(|v| v.unwrap_or(Value::Null))
                    .collect();
                map.insert(format!("_{}", name), Value::Array(array));
            }
        } else {
            if members.len() > 1 {
                return Err(SerdeError::Custom(format!(
                    "element '{}' appears {} times but does not repeat",
                    name,
                    members.len()
                )));
            }
            if let Some(Some(value)) = values.pop() {
                map.insert(name.to_string(), value);
            }
            if let Some(Some(ext)) = extensions.pop() {
                map.insert(format!("_{}", name), ext);
            }
        }
    }

    Ok(())
}

fn unknown_content(def: &TypeDef, name: &str, what: &str) -> SerdeError {
    SerdeError::Custom(format!("{} '{}' is not defined on {}", what, name, def.name))
}

/// Converts one element into its JSON value and its `_` companion.
fn element_to_json(
    kind: ElementKind,
    element: &XmlElement,
) -> Result<(Option<Value>, Option<Value>)> {
    if let Some(markup) = &element.xhtml {
        return match kind {
            ElementKind::Xhtml => Ok((Some(Value::String(markup.clone())), None)),
            _ => Err(SerdeError::Custom(format!(
                "narrative markup is not allowed in '{}'",
                element.name
            ))),
        };
    }

    match kind {
        ElementKind::Resource => {
            let [resource] = element.children.as_slice() else {
                return Err(SerdeError::Custom(format!(
                    "element '{}' must contain exactly one resource",
                    element.name
                )));
            };
            Ok((Some(resource_to_json(resource)?), None))
        }
        ElementKind::Complex(type_name) => {
            let def = model::lookup(type_name).ok_or_else(|| {
                SerdeError::Custom(format!(
                    "type '{}' is not described by the element model",
                    type_name
                ))
            })?;
            let mut map = Map::new();
            children_to_json(def, element, &mut map)?;
            Ok((Some(Value::Object(map)), None))
        }
        ElementKind::Xhtml => Err(SerdeError::Custom(format!(
            "element '{}' must be an XHTML div",
            element.name
        ))),
        // `TypeDef::element` resolves choices to a concrete kind.
        ElementKind::Choice => Err(SerdeError::Custom(format!(
            "element '{}' has an unresolved choice type",
            element.name
        ))),
        primitive => {
            let value = element
                .attribute("value")
                .map(|text| typed_primitive(primitive, &element.name, text))
                .transpose()?;

            if let Some((key, _)) = element
                .attributes
                .iter()
                .find(|(k, _)| k != "value" && k != "id")
            {
                return Err(unknown_content(&model::ELEMENT, key, "attribute"));
            }

            let id = element.attribute("id");
            let ext = if id.is_some() || !element.children.is_empty() {
                let mut map = Map::new();
                if let Some(id) = id {
                    map.insert("id".to_string(), Value::String(id.to_string()));
                }
                child_elements_to_json(&model::ELEMENT, element, &mut map)?;
                Some(Value::Object(map))
            } else {
                None
            };
            Ok((value, ext))
        }
    }
}

fn typed_primitive(kind: ElementKind, name: &str, text: &str) -> Result<Value> {
    let invalid = |expected: &str| {
        SerdeError::Custom(format!(
            "element '{}' has value '{}' which is not {}",
            name, text, expected
        ))
    };

    match kind {
        ElementKind::Boolean => match text {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid("a boolean")),
        },
        ElementKind::Integer => text
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| invalid("an integer")),
        ElementKind::Decimal => match serde_json::from_str::<Value>(text) {
            Ok(number @ Value::Number(_)) => Ok(number),
            _ => Err(invalid("a decimal")),
        },
        _ => Ok(Value::String(text.to_string())),
    }
}
