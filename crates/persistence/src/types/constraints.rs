//! Exact-match constraint maps.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::Record;

/// An indexed record attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    /// The record identifier.
    Id,
    /// The owning patient reference.
    Patient,
    /// The status derived from the document.
    Status,
}

impl Attribute {
    /// Returns the attribute name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Id => "id",
            Attribute::Patient => "patient",
            Attribute::Status => "status",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conjunction of `attribute = value` constraints.
///
/// ```
/// use priorauth_persistence::types::{Attribute, Constraints};
///
/// let constraints = Constraints::new().with_patient("1").with_status("active");
/// assert_eq!(constraints.get(Attribute::Patient), Some("1"));
/// assert!(constraints.id().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    entries: BTreeMap<Attribute, String>,
}

impl Constraints {
    /// Creates an empty constraint map, which matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constraints naming exactly one record by its key.
    pub fn for_key(id: impl Into<String>, patient: impl Into<String>) -> Self {
        Self::new().with_id(id).with_patient(patient)
    }

    /// Adds an `id` constraint.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with(Attribute::Id, id)
    }

    /// Adds a `patient` constraint.
    pub fn with_patient(self, patient: impl Into<String>) -> Self {
        self.with(Attribute::Patient, patient)
    }

    /// Adds a `status` constraint.
    pub fn with_status(self, status: impl Into<String>) -> Self {
        self.with(Attribute::Status, status)
    }

    /// Adds a constraint, replacing any previous value for the attribute.
    pub fn with(mut self, attribute: Attribute, value: impl Into<String>) -> Self {
        self.insert(attribute, value);
        self
    }

    /// Sets a constraint, returning the previous value for the attribute.
    pub fn insert(&mut self, attribute: Attribute, value: impl Into<String>) -> Option<String> {
        self.entries.insert(attribute, value.into())
    }

    /// Returns the constrained value for an attribute.
    pub fn get(&self, attribute: Attribute) -> Option<&str> {
        self.entries.get(&attribute).map(String::as_str)
    }

    /// Returns the `id` constraint.
    pub fn id(&self) -> Option<&str> {
        self.get(Attribute::Id)
    }

    /// Returns the `patient` constraint.
    pub fn patient(&self) -> Option<&str> {
        self.get(Attribute::Patient)
    }

    /// Returns the `status` constraint.
    pub fn status(&self) -> Option<&str> {
        self.get(Attribute::Status)
    }

    /// Returns true if no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the constraints in attribute order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &str)> {
        self.entries.iter().map(|(a, v)| (*a, v.as_str()))
    }

    /// Returns true if the record satisfies every constraint.
    pub fn matches(&self, record: &Record) -> bool {
        self.iter().all(|(attribute, value)| record.attribute(attribute) == value)
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (attribute, value) in self.iter() {
            if !first {
                f.write_str("&")?;
            }
            write!(f, "{}={}", attribute, value)?;
            first = false;
        }
        Ok(())
    }
}
