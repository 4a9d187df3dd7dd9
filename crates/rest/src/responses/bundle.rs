//! Searchset envelope building.
//!
//! A search always answers with a `searchset` Bundle, even when nothing
//! matched.

use chrono::{DateTime, SecondsFormat, Utc};
use priorauth_persistence::types::Record;
use serde_json::{Value, json};
use uuid::Uuid;

/// A link in a Bundle.
#[derive(Debug, Clone)]
pub struct BundleLink {
    /// The relation type (self, next, previous, first, last).
    pub relation: String,
    /// The URL.
    pub url: String,
}

impl BundleLink {
    /// Creates a new link.
    pub fn new(relation: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            url: url.into(),
        }
    }

    /// Creates a self link.
    pub fn self_link(url: impl Into<String>) -> Self {
        Self::new("self", url)
    }

    /// Converts to FHIR JSON.
    pub fn to_json(&self) -> Value {
        json!({
            "relation": self.relation,
            "url": self.url
        })
    }
}

/// A search match in a Bundle.
#[derive(Debug, Clone)]
pub struct BundleEntry {
    /// Full URL of the resource.
    pub full_url: String,
    /// The resource itself.
    pub resource: Value,
}

impl BundleEntry {
    /// Creates a search result entry.
    pub fn search_result(resource: Value, full_url: impl Into<String>) -> Self {
        Self {
            full_url: full_url.into(),
            resource,
        }
    }

    /// Creates a search result entry for a stored record, addressed under
    /// `base_url`.
    ///
    /// Records are keyed by id and owner together, so the fullUrl is the
    /// keyed fetch for the record rather than `{Type}/{id}`.
    pub fn from_record(record: Record, base_url: &str) -> Self {
        let full_url = record_url(base_url, &record);
        Self::search_result(record.into_document(), full_url)
    }

    /// Converts to FHIR JSON.
    pub fn to_json(&self) -> Value {
        json!({
            "fullUrl": self.full_url,
            "resource": self.resource,
            "search": {"mode": "match"}
        })
    }
}

/// Returns the URL that fetches exactly `record`.
pub fn record_url(base_url: &str, record: &Record) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("identifier", record.id())
        .append_pair("patient.identifier", record.patient())
        .finish();
    format!("{}/{}?{}", base_url, record.resource_type(), query)
}

/// Builder for searchset Bundles.
#[derive(Debug)]
pub struct BundleBuilder {
    id: String,
    last_updated: DateTime<Utc>,
    links: Vec<BundleLink>,
    entries: Vec<BundleEntry>,
}

impl BundleBuilder {
    /// Creates a searchset builder with a fresh id, stamped now.
    pub fn searchset() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            last_updated: Utc::now(),
            links: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Sets the Bundle id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets `meta.lastUpdated`.
    pub fn last_updated(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = at;
        self
    }

    /// Adds a link.
    pub fn add_link(mut self, link: BundleLink) -> Self {
        self.links.push(link);
        self
    }

    /// Adds a self link.
    pub fn self_link(self, url: impl Into<String>) -> Self {
        self.add_link(BundleLink::self_link(url))
    }

    /// Adds an entry.
    pub fn add_entry(mut self, entry: BundleEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Adds entries in order.
    pub fn entries(mut self, entries: impl IntoIterator<Item = BundleEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Builds the Bundle resource. `total` is the number of entries.
    pub fn build(self) -> Value {
        let mut bundle = json!({
            "resourceType": "Bundle",
            "id": self.id,
            "meta": {
                "lastUpdated": self.last_updated.to_rfc3339_opts(SecondsFormat::Millis, true)
            },
            "type": "searchset",
            "total": self.entries.len()
        });

        if !self.links.is_empty() {
            bundle["link"] = Value::Array(self.links.iter().map(BundleLink::to_json).collect());
        }

        // An empty entry array is not valid FHIR; an empty match set has none.
        if !self.entries.is_empty() {
            bundle["entry"] = Value::Array(self.entries.iter().map(BundleEntry::to_json).collect());
        }

        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use priorauth_fhir::{StructuralValidator, Validator};

    #[test]
    fn test_searchset_bundle() {
        let claim = json!({
            "resourceType": "Claim",
            "id": "minimal"
        });

        let bundle = BundleBuilder::searchset()
            .self_link("http://example.com/Claim?patient.identifier=1")
            .add_entry(BundleEntry::search_result(
                claim,
                "http://example.com/Claim/minimal",
            ))
            .build();

        assert_eq!(bundle["resourceType"], "Bundle");
        assert_eq!(bundle["type"], "searchset");
        assert_eq!(bundle["total"], 1);
        assert_eq!(bundle["link"][0]["relation"], "self");
        assert_eq!(bundle["entry"][0]["fullUrl"], "http://example.com/Claim/minimal");
        assert_eq!(bundle["entry"][0]["search"]["mode"], "match");
    }

    #[test]
    fn test_empty_searchset_has_no_entry() {
        let bundle = BundleBuilder::searchset().build();
        assert_eq!(bundle["total"], 0);
        assert!(bundle.get("entry").is_none());
        assert!(StructuralValidator::new().validate(&bundle).is_valid());
    }

    #[test]
    fn test_fresh_ids() {
        let a = BundleBuilder::searchset().build();
        let b = BundleBuilder::searchset().build();
        assert_ne!(a["id"], b["id"]);
    }

    #[test]
    fn test_last_updated_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let bundle = BundleBuilder::searchset().id("fixed").last_updated(at).build();
        assert_eq!(bundle["id"], "fixed");
        assert_eq!(bundle["meta"]["lastUpdated"], "2024-03-01T12:30:00.000Z");
    }
}
