//! FHIR XML serialization.
//!
//! Walks a JSON resource and writes quick-xml events. Children are written in
//! element-model order; content the model does not describe follows in
//! document order, so nothing is dropped.

use std::io::Write;

use priorauth_fhir::FHIR_NAMESPACE;
use priorauth_fhir::model::{self, ElementKind, TypeDef};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use serde_json::{Map, Value};

use super::utils;
use crate::error::{Result, SerdeError};

/// Serialize a FHIR resource to an XML string.
pub fn to_xml_string(resource: &Value) -> Result<String> {
    let bytes = to_xml_vec(resource)?;
    String::from_utf8(bytes)
        .map_err(|e| SerdeError::Custom(format!("XML output is not valid UTF-8: {}", e)))
}

/// Serialize a FHIR resource to an indented XML string.
pub fn to_xml_string_pretty(resource: &Value) -> Result<String> {
    let mut serializer = XmlSerializer::pretty(Vec::new());
    serializer.write_document(resource)?;
    String::from_utf8(serializer.into_inner())
        .map_err(|e| SerdeError::Custom(format!("XML output is not valid UTF-8: {}", e)))
}

/// Serialize a FHIR resource to XML bytes.
pub fn to_xml_vec(resource: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    to_xml_writer(&mut buf, resource)?;
    Ok(buf)
}

/// Serialize a FHIR resource as XML into a writer.
pub fn to_xml_writer<W: Write>(writer: W, resource: &Value) -> Result<()> {
    let mut serializer = XmlSerializer::new(writer);
    serializer.write_document(resource)
}

/// XML serializer that writes directly to quick-xml.
pub struct XmlSerializer<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlSerializer<W> {
    /// Creates a new XML serializer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Writer::new(writer),
        }
    }

    /// Creates a serializer that indents nested elements by two spaces.
    pub fn pretty(writer: W) -> Self {
        Self {
            writer: Writer::new_with_indent(writer, b' ', 2),
        }
    }

    /// Consumes the serializer and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Writes the XML declaration followed by the resource.
    pub fn write_document(&mut self, resource: &Value) -> Result<()> {
        let (name, obj) = utils::resource_parts(resource)?;
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_resource(name, obj, true)
    }

    fn write_resource(&mut self, name: &str, obj: &Map<String, Value>, root: bool) -> Result<()> {
        let mut start = BytesStart::new(name);
        // Nested resources inherit the namespace from the root.
        if root {
            start.push_attribute(("xmlns", FHIR_NAMESPACE));
        }
        self.write_object(start, model::resource(name), obj, true)
    }

    /// Writes a complex element: attributes on the start tag, then children.
    fn write_object(
        &mut self,
        mut start: BytesStart<'_>,
        def: Option<&'static TypeDef>,
        obj: &Map<String, Value>,
        is_resource: bool,
    ) -> Result<()> {
        let mut children = Vec::new();
        for key in ordered_keys(def, obj) {
            match obj.get(key) {
                Some(Value::String(s)) if is_attribute(def, is_resource, key) => {
                    start.push_attribute((key, s.as_str()));
                }
                _ => children.push(key),
            }
        }

        if children.is_empty() {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        let end = start.to_end().into_owned();
        self.writer.write_event(Event::Start(start))?;
        for key in children {
            let ext = obj.get(&format!("_{}", key));
            self.write_property(def, key, obj.get(key), ext)?;
        }
        self.writer.write_event(Event::End(end))?;
        Ok(())
    }

    /// Writes one JSON property (and its `_` companion) as zero or more elements.
    fn write_property(
        &mut self,
        parent: Option<&'static TypeDef>,
        name: &str,
        value: Option<&Value>,
        ext: Option<&Value>,
    ) -> Result<()> {
        let kind = parent.and_then(|def| def.element(name)).map(|e| e.kind);

        fn present(v: Option<&Value>) -> Option<&Value> {
            v.filter(|v| !v.is_null())
        }
        match (value, ext) {
            (Some(Value::Array(_)), _) | (_, Some(Value::Array(_))) => {
                let values = value.and_then(Value::as_array);
                let exts = ext.and_then(Value::as_array);
                let len = values
                    .map(Vec::len)
                    .unwrap_or(0)
                    .max(exts.map(Vec::len).unwrap_or(0));
                for i in 0..len {
                    let v = present(values.and_then(|a| a.get(i)));
                    let e = present(exts.and_then(|a| a.get(i)));
                    if v.is_some() || e.is_some() {
                        self.write_item(name, kind, v, e)?;
                    }
                }
                Ok(())
            }
            _ => {
                let (v, e) = (present(value), present(ext));
                if v.is_some() || e.is_some() {
                    self.write_item(name, kind, v, e)?;
                }
                Ok(())
            }
        }
    }

    fn write_item(
        &mut self,
        name: &str,
        kind: Option<ElementKind>,
        value: Option<&Value>,
        ext: Option<&Value>,
    ) -> Result<()> {
        match value {
            Some(resource @ Value::Object(obj))
                if kind == Some(ElementKind::Resource)
                    || (kind.is_none() && obj.contains_key("resourceType")) =>
            {
                let (resource_type, body) = utils::resource_parts(resource)?;
                let start = BytesStart::new(name);
                let end = start.to_end().into_owned();
                self.writer.write_event(Event::Start(start))?;
                self.write_resource(resource_type, body, false)?;
                self.writer.write_event(Event::End(end))?;
                Ok(())
            }
            Some(Value::Object(obj)) => {
                let def = match kind {
                    Some(ElementKind::Complex(type_name)) => model::lookup(type_name),
                    _ => None,
                };
                self.write_object(BytesStart::new(name), def, obj, false)
            }
            Some(Value::Array(_)) => Err(SerdeError::Custom(format!(
                "element '{}' contains a nested array",
                name
            ))),
            Some(Value::String(div))
                if kind == Some(ElementKind::Xhtml)
                    || (kind.is_none() && utils::is_div_element(name)) =>
            {
                self.writer
                    .write_event(Event::Text(BytesText::from_escaped(div.as_str())))?;
                Ok(())
            }
            _ => self.write_primitive(name, value, ext),
        }
    }

    /// Writes `<name id=".." value="..">` with any primitive extensions as children.
    fn write_primitive(&mut self, name: &str, value: Option<&Value>, ext: Option<&Value>) -> Result<()> {
        let mut start = BytesStart::new(name);
        let ext = ext.and_then(Value::as_object);

        if let Some(id) = ext.and_then(|e| e.get("id")).and_then(Value::as_str) {
            start.push_attribute(("id", id));
        }
        if let Some(value) = value {
            let text = utils::primitive_text(name, value)?;
            start.push_attribute(("value", text.as_str()));
        }

        match ext.and_then(|e| e.get("extension")) {
            Some(extensions) => {
                let end = start.to_end().into_owned();
                self.writer.write_event(Event::Start(start))?;
                self.write_property(Some(&model::ELEMENT), "extension", Some(extensions), None)?;
                self.writer.write_event(Event::End(end))?;
            }
            None => {
                self.writer.write_event(Event::Empty(start))?;
            }
        }
        Ok(())
    }
}

/// Property names in element-model order, followed by unmodelled names.
///
/// `_name` companions collapse onto `name`; `resourceType` is dropped since it
/// becomes the element name.
fn ordered_keys<'a>(def: Option<&TypeDef>, obj: &'a Map<String, Value>) -> Vec<&'a str> {
    let bases = || {
        obj.keys()
            .map(|k| k.strip_prefix('_').unwrap_or(k))
            .filter(|k| *k != "resourceType")
    };

    let mut keys: Vec<&'a str> = Vec::with_capacity(obj.len());
    if let Some(def) = def {
        for element in def.all_elements() {
            for base in bases() {
                if element.matches(base) && !keys.contains(&base) {
                    keys.push(base);
                }
            }
        }
    }
    for base in bases() {
        if !keys.contains(&base) {
            keys.push(base);
        }
    }
    keys
}

fn is_attribute(def: Option<&TypeDef>, is_resource: bool, key: &str) -> bool {
    match def {
        Some(def) => def.element(key).is_some_and(|e| e.attribute),
        None => !is_resource && (key == "id" || key == "url"),
    }
}
