//! Structural validation against the element model.
//!
//! [`StructuralValidator`] walks a JSON document alongside its [`TypeDef`] and
//! reports problems as OperationOutcome [`Issue`]s:
//!
//! - the `resourceType` must be known
//! - required elements must be present
//! - arrays only where the element repeats, never empty, never `null`
//! - primitive values must have the right JSON kind and must not be empty
//! - resource ids must match `[A-Za-z0-9\-\.]{1,64}`
//! - codes with a required binding must come from the bound set
//! - nested resources (`contained`, `Bundle.entry.resource`) are validated
//!   recursively
//!
//! Elements the model does not know are reported as warnings by default, so
//! documents carrying content from newer or wider profiles still pass.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::model::{self, ElementDef, ElementKind, TypeDef};
use crate::outcome::{self, Issue, IssueSeverity, IssueType};

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-\.]{1,64}$").expect("id pattern is valid"));

/// Returns true if `id` is a well-formed resource id.
pub fn is_valid_id(id: &str) -> bool {
    ID_PATTERN.is_match(id)
}

/// Result of validating one document.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    /// The `resourceType` of the validated document, if it had one.
    pub resource_type: Option<String>,
    /// Every issue found, in document order.
    pub issues: Vec<Issue>,
}

impl ValidationOutcome {
    /// Returns true if no issue has severity `error` or `fatal`.
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(|i| i.severity.is_failure())
    }

    /// Number of `error` and `fatal` issues.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Number of `warning` issues.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count()
    }

    /// Iterates over `error` and `fatal` issues.
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity.is_failure())
    }

    /// Renders every issue as an OperationOutcome resource.
    pub fn to_operation_outcome(&self) -> Value {
        outcome::operation_outcome(&self.issues)
    }
}

/// Validates documents before they leave the service.
pub trait Validator: Send + Sync {
    /// Validates a single resource document.
    fn validate(&self, resource: &Value) -> ValidationOutcome;
}

/// Validator driven by the static element model.
#[derive(Debug, Clone)]
pub struct StructuralValidator {
    unknown_element_severity: IssueSeverity,
}

impl Default for StructuralValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralValidator {
    /// Creates a validator that reports unknown elements as warnings.
    pub fn new() -> Self {
        Self {
            unknown_element_severity: IssueSeverity::Warning,
        }
    }

    /// Creates a validator that rejects unknown elements.
    pub fn strict() -> Self {
        Self {
            unknown_element_severity: IssueSeverity::Error,
        }
    }

    fn check_resource(
        &self,
        def: &'static TypeDef,
        obj: &Map<String, Value>,
        path: &str,
        issues: &mut Vec<Issue>,
    ) {
        if let Some(id) = obj.get("id").and_then(Value::as_str) {
            if !ID_PATTERN.is_match(id) {
                issues.push(
                    Issue::error(IssueType::Value, format!("invalid resource id '{id}'"))
                        .with_expression(format!("{path}.id")),
                );
            }
        }

        self.check_object(def, obj, path, issues);

        if def.name == "Bundle" {
            check_bundle_invariants(obj, path, issues);
        }
    }

    fn check_object(
        &self,
        def: &'static TypeDef,
        obj: &Map<String, Value>,
        path: &str,
        issues: &mut Vec<Issue>,
    ) {
        for (key, value) in obj {
            if key == "resourceType" && def.is_resource() {
                continue;
            }

            if let Some(base) = key.strip_prefix('_') {
                match def.element(base) {
                    Some(element) if element.kind.is_primitive() => {
                        check_primitive_extension(value, &format!("{path}.{key}"), issues);
                    }
                    _ => self.unknown_element(key, path, issues),
                }
                continue;
            }

            match def.element(key) {
                Some(element) => self.check_element(&element, key, value, path, issues),
                None => self.unknown_element(key, path, issues),
            }
        }

        for element in def.all_elements().filter(|e| e.min > 0) {
            let present = match element.choice_prefix() {
                Some(_) => obj.keys().any(|k| element.matches(k)),
                None => {
                    obj.contains_key(element.name)
                        || obj.contains_key(&format!("_{}", element.name))
                }
            };
            if !present {
                issues.push(
                    Issue::error(
                        IssueType::Required,
                        format!("missing required element '{}'", element.name),
                    )
                    .with_expression(format!("{path}.{}", element.name)),
                );
            }
        }
    }

    fn unknown_element(&self, key: &str, path: &str, issues: &mut Vec<Issue>) {
        issues.push(
            Issue::new(
                self.unknown_element_severity,
                IssueType::Structure,
                format!("unrecognized element '{key}'"),
            )
            .with_expression(format!("{path}.{key}")),
        );
    }

    fn check_element(
        &self,
        element: &ElementDef,
        key: &str,
        value: &Value,
        path: &str,
        issues: &mut Vec<Issue>,
    ) {
        let path = format!("{path}.{key}");

        match value {
            Value::Null => issues.push(
                Issue::error(IssueType::Structure, "element must not be null")
                    .with_expression(path),
            ),
            Value::Array(items) => {
                if !element.repeating {
                    issues.push(
                        Issue::error(
                            IssueType::Structure,
                            format!("element '{key}' does not repeat but an array was given"),
                        )
                        .with_expression(path),
                    );
                } else if items.is_empty() {
                    issues.push(
                        Issue::error(IssueType::Structure, "arrays must not be empty")
                            .with_expression(path),
                    );
                } else {
                    for (i, item) in items.iter().enumerate() {
                        // Nulls keep primitive arrays aligned with their `_` extension arrays.
                        if item.is_null() && element.kind.is_primitive() {
                            continue;
                        }
                        self.check_value(element, item, &format!("{path}[{i}]"), issues);
                    }
                }
            }
            _ if element.repeating => issues.push(
                Issue::error(
                    IssueType::Structure,
                    format!("element '{key}' repeats and must be an array"),
                )
                .with_expression(path),
            ),
            _ => self.check_value(element, value, &path, issues),
        }
    }

    fn check_value(&self, element: &ElementDef, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        let kind_error = |expected: &str| {
            Issue::error(IssueType::Value, format!("expected {expected}")).with_expression(path)
        };

        match element.kind {
            ElementKind::String => match value.as_str() {
                Some("") => issues.push(
                    Issue::error(IssueType::Value, "string values must not be empty")
                        .with_expression(path),
                ),
                Some(code) => {
                    if let Some(codes) = element.binding {
                        if !codes.contains(&code) {
                            issues.push(
                                Issue::error(
                                    IssueType::CodeInvalid,
                                    format!(
                                        "'{code}' is not a valid code; expected one of: {}",
                                        codes.join(", ")
                                    ),
                                )
                                .with_expression(path),
                            );
                        }
                    }
                }
                None => issues.push(kind_error("a string")),
            },
            ElementKind::Boolean => {
                if !value.is_boolean() {
                    issues.push(kind_error("a boolean"));
                }
            }
            ElementKind::Integer => {
                if !(value.is_i64() || value.is_u64()) {
                    issues.push(kind_error("an integer"));
                }
            }
            ElementKind::Decimal => {
                if !value.is_number() {
                    issues.push(kind_error("a decimal number"));
                }
            }
            ElementKind::Xhtml => {
                if !value.as_str().is_some_and(|s| s.trim_start().starts_with("<div")) {
                    issues.push(kind_error("an XHTML <div> element"));
                }
            }
            ElementKind::Complex(type_name) => match value.as_object() {
                Some(obj) if obj.is_empty() => issues.push(
                    Issue::error(IssueType::Structure, "elements must have content")
                        .with_expression(path),
                ),
                Some(obj) => {
                    if let Some(def) = model::lookup(type_name) {
                        self.check_object(def, obj, path, issues);
                    }
                }
                None => issues.push(kind_error(&format!("a {type_name} object"))),
            },
            ElementKind::Resource => match value.as_object() {
                Some(obj) => self.check_nested_resource(obj, path, issues),
                None => issues.push(kind_error("a resource object")),
            },
            ElementKind::Choice => {}
        }
    }

    fn check_nested_resource(&self, obj: &Map<String, Value>, path: &str, issues: &mut Vec<Issue>) {
        let Some(resource_type) = obj.get("resourceType").and_then(Value::as_str) else {
            issues.push(
                Issue::error(IssueType::Required, "nested resource has no resourceType")
                    .with_expression(path),
            );
            return;
        };

        match model::resource(resource_type) {
            Some(def) => self.check_resource(def, obj, path, issues),
            None => issues.push(
                Issue::information(
                    IssueType::NotSupported,
                    format!("nested {resource_type} resource was not validated"),
                )
                .with_expression(path),
            ),
        }
    }
}

impl Validator for StructuralValidator {
    fn validate(&self, resource: &Value) -> ValidationOutcome {
        let mut issues = Vec::new();

        let Some(obj) = resource.as_object() else {
            issues.push(Issue::error(
                IssueType::Structure,
                "resource must be a JSON object",
            ));
            return ValidationOutcome {
                resource_type: None,
                issues,
            };
        };

        let resource_type = obj.get("resourceType").and_then(Value::as_str);
        match resource_type {
            None => issues.push(Issue::error(IssueType::Required, "missing resourceType")),
            Some(name) => match model::resource(name) {
                Some(def) => self.check_resource(def, obj, name, &mut issues),
                None => issues.push(Issue::error(
                    IssueType::NotSupported,
                    format!("unknown resource type '{name}'"),
                )),
            },
        }

        ValidationOutcome {
            resource_type: resource_type.map(str::to_string),
            issues,
        }
    }
}

fn check_primitive_extension(value: &Value, path: &str, issues: &mut Vec<Issue>) {
    let objects: Vec<&Value> = match value {
        Value::Array(items) => items.iter().filter(|v| !v.is_null()).collect(),
        other => vec![other],
    };

    for item in objects {
        match item.as_object() {
            Some(obj) => {
                for key in obj.keys().filter(|k| *k != "id" && *k != "extension") {
                    issues.push(
                        Issue::warning(
                            IssueType::Structure,
                            format!("unrecognized element '{key}' on primitive"),
                        )
                        .with_expression(path),
                    );
                }
            }
            None => issues.push(
                Issue::error(IssueType::Structure, "primitive extensions must be objects")
                    .with_expression(path),
            ),
        }
    }
}

fn check_bundle_invariants(obj: &Map<String, Value>, path: &str, issues: &mut Vec<Issue>) {
    let bundle_type = obj.get("type").and_then(Value::as_str);
    let is_search = bundle_type == Some("searchset");

    if obj.contains_key("total") && !matches!(bundle_type, Some("searchset" | "history")) {
        issues.push(
            Issue::error(
                IssueType::Invariant,
                "bdl-1: total only when a search or history",
            )
            .with_expression(format!("{path}.total")),
        );
    }

    let mut seen = HashSet::new();
    let entries = obj.get("entry").and_then(Value::as_array);
    for (i, entry) in entries.into_iter().flatten().enumerate() {
        if entry.get("search").is_some() && !is_search {
            issues.push(
                Issue::error(
                    IssueType::Invariant,
                    "bdl-2: entry.search only when a search",
                )
                .with_expression(format!("{path}.entry[{i}].search")),
            );
        }

        // History bundles legitimately repeat a fullUrl across versions.
        if bundle_type == Some("history") {
            continue;
        }
        let Some(full_url) = entry.get("fullUrl").and_then(Value::as_str) else {
            continue;
        };
        let version = entry
            .pointer("/resource/meta/versionId")
            .and_then(Value::as_str);
        if !seen.insert((full_url, version)) {
            issues.push(
                Issue::error(
                    IssueType::Invariant,
                    format!("bdl-7: fullUrl '{full_url}' appears more than once"),
                )
                .with_expression(format!("{path}.entry[{i}].fullUrl")),
            );
        }
    }
}
