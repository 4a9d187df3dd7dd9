//! In-memory indexed backend.
//!
//! Each resource type has its own [`Table`] behind a `parking_lot::RwLock`, so
//! reads of one type run concurrently and a write never blocks another type.
//! A table holds the records in insertion order plus three secondary indexes
//! (`id`, `patient`, `status`) that are updated under the same write lock as
//! the record itself.
//!
//! Writes and deletes re-check that the store is open while holding the
//! table's write lock, and [`RecordStorage::close`] takes every write lock
//! once after clearing the flag. Nothing commits after `close` returns.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use priorauth_fhir::{ResourceType, is_valid_id};
use serde_json::Value;

use crate::core::RecordStorage;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::{Attribute, Constraints, NewRecord, Record};

const BACKEND_NAME: &str = "memory";

/// In-memory record store.
pub struct MemoryBackend {
    tables: HashMap<ResourceType, RwLock<Table>>,
    open: AtomicBool,
}

impl Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: BTreeMap<_, _> = self
            .tables
            .iter()
            .map(|(rt, table)| (rt.as_str(), table.read().records.len()))
            .collect();
        f.debug_struct("MemoryBackend")
            .field("open", &self.open.load(Ordering::Acquire))
            .field("records", &counts)
            .finish()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Creates an empty, open store with a table per resource type.
    pub fn new() -> Self {
        let tables = ResourceType::ALL
            .into_iter()
            .map(|rt| (rt, RwLock::new(Table::default())))
            .collect();
        Self {
            tables,
            open: AtomicBool::new(true),
        }
    }

    /// Returns true until [`RecordStorage::close`] is called.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> StorageResult<()> {
        if self.is_open() {
            return Ok(());
        }
        Err(BackendError::Unavailable {
            backend_name: BACKEND_NAME.to_string(),
            message: "store has been closed".to_string(),
        }
        .into())
    }

    fn table(&self, resource_type: ResourceType) -> StorageResult<&RwLock<Table>> {
        self.ensure_open()?;
        self.tables.get(&resource_type).ok_or_else(|| {
            BackendError::Internal {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("no table for {}", resource_type),
                source: None,
            }
            .into()
        })
    }
}

#[async_trait]
impl RecordStorage for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn write(&self, resource_type: ResourceType, record: NewRecord) -> StorageResult<Record> {
        let table = self.table(resource_type)?;
        let NewRecord {
            id,
            patient,
            resource,
        } = record;
        let document = prepare_document(resource_type, &id, &patient, resource)?;

        let record = Record::new(resource_type, id, patient, document, Utc::now());
        let replaced = {
            let mut guard = table.write();
            self.ensure_open()?;
            guard.upsert(record.clone())
        };

        tracing::debug!(
            resource_type = %resource_type,
            id = %record.id(),
            patient = %record.patient(),
            status = %record.status(),
            replaced,
            "Wrote record"
        );
        Ok(record)
    }

    async fn read(
        &self,
        resource_type: ResourceType,
        constraints: &Constraints,
    ) -> StorageResult<Option<Record>> {
        let table = self.table(resource_type)?;
        let (Some(id), Some(patient)) = (constraints.id(), constraints.patient()) else {
            let missing = if constraints.id().is_none() { "id" } else { "patient" };
            return Err(StorageError::IncompleteKey {
                resource_type,
                missing,
            });
        };

        let guard = table.read();
        Ok(guard
            .lookup(id, patient)
            .filter(|record| constraints.matches(record))
            .cloned())
    }

    async fn read_all(
        &self,
        resource_type: ResourceType,
        constraints: &Constraints,
    ) -> StorageResult<Vec<Record>> {
        let table = self.table(resource_type)?;
        let records = table.read().select(constraints);
        tracing::debug!(
            resource_type = %resource_type,
            constraints = %constraints,
            matches = records.len(),
            "Selected records"
        );
        Ok(records)
    }

    async fn delete(
        &self,
        resource_type: ResourceType,
        id: &str,
        patient: &str,
    ) -> StorageResult<bool> {
        let table = self.table(resource_type)?;
        let removed = {
            let mut guard = table.write();
            self.ensure_open()?;
            guard.remove(id, patient)
        };
        tracing::debug!(
            resource_type = %resource_type,
            id,
            patient,
            removed,
            "Deleted record"
        );
        Ok(removed)
    }

    async fn count(&self, resource_type: ResourceType) -> StorageResult<usize> {
        let table = self.table(resource_type)?;
        Ok(table.read().records.len())
    }

    async fn close(&self) -> StorageResult<()> {
        if self.open.swap(false, Ordering::AcqRel) {
            // Wait out writers that checked the flag before it was cleared.
            for table in self.tables.values() {
                drop(table.write());
            }
            tracing::info!(backend = BACKEND_NAME, "Store closed");
        }
        Ok(())
    }
}

/// Checks write input and fills in the document's `resourceType` and `id`.
fn prepare_document(
    resource_type: ResourceType,
    id: &str,
    patient: &str,
    resource: Value,
) -> StorageResult<Value> {
    let invalid = |message: String| StorageError::InvalidRecord {
        resource_type,
        message,
    };

    if !is_valid_id(id) {
        return Err(invalid(format!(
            "id '{id}' must be 1-64 characters of [A-Za-z0-9-.]"
        )));
    }
    if patient.is_empty() {
        return Err(invalid("patient must not be empty".to_string()));
    }

    let Value::Object(mut document) = resource else {
        return Err(invalid("document must be a JSON object".to_string()));
    };

    match document.get("resourceType") {
        None => {
            document.insert(
                "resourceType".to_string(),
                Value::String(resource_type.as_str().to_string()),
            );
        }
        Some(Value::String(declared)) if declared == resource_type.as_str() => {}
        Some(other) => {
            return Err(invalid(format!(
                "document resourceType {} does not match {}",
                other, resource_type
            )));
        }
    }

    if !document.contains_key("id") {
        document.insert("id".to_string(), Value::String(id.to_string()));
    }

    Ok(Value::Object(document))
}

type Key = (String, String);

/// Records of one resource type and their indexes.
#[derive(Debug, Default)]
struct Table {
    /// Records keyed by insertion sequence.
    records: BTreeMap<u64, Record>,
    by_key: HashMap<Key, u64>,
    by_id: HashMap<String, BTreeSet<u64>>,
    by_patient: HashMap<String, BTreeSet<u64>>,
    by_status: HashMap<String, BTreeSet<u64>>,
    next_seq: u64,
}

impl Table {
    /// Inserts or replaces a record. Returns true if a record was replaced.
    fn upsert(&mut self, record: Record) -> bool {
        let key = (record.id().to_string(), record.patient().to_string());
        let (seq, replaced) = match self.by_key.get(&key) {
            Some(&seq) => {
                if let Some(old) = self.records.remove(&seq) {
                    self.unindex(seq, &old);
                }
                (seq, true)
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.by_key.insert(key, seq);
                (seq, false)
            }
        };

        self.index(seq, &record);
        self.records.insert(seq, record);
        replaced
    }

    fn remove(&mut self, id: &str, patient: &str) -> bool {
        let Some(seq) = self.by_key.remove(&(id.to_string(), patient.to_string())) else {
            return false;
        };
        match self.records.remove(&seq) {
            Some(old) => {
                self.unindex(seq, &old);
                true
            }
            None => false,
        }
    }

    fn lookup(&self, id: &str, patient: &str) -> Option<&Record> {
        let seq = self.by_key.get(&(id.to_string(), patient.to_string()))?;
        self.records.get(seq)
    }

    /// Returns copies of all matching records in insertion order.
    fn select(&self, constraints: &Constraints) -> Vec<Record> {
        let mut candidates: Option<&BTreeSet<u64>> = None;
        for (attribute, value) in constraints.iter() {
            let Some(set) = self.index_for(attribute).get(value) else {
                return Vec::new();
            };
            if candidates.is_none_or(|current| set.len() < current.len()) {
                candidates = Some(set);
            }
        }

        match candidates {
            Some(seqs) => seqs
                .iter()
                .filter_map(|seq| self.records.get(seq))
                .filter(|record| constraints.matches(record))
                .cloned()
                .collect(),
            None => self.records.values().cloned().collect(),
        }
    }

    fn index_for(&self, attribute: Attribute) -> &HashMap<String, BTreeSet<u64>> {
        match attribute {
            Attribute::Id => &self.by_id,
            Attribute::Patient => &self.by_patient,
            Attribute::Status => &self.by_status,
        }
    }

    fn index(&mut self, seq: u64, record: &Record) {
        for (index, value) in [
            (&mut self.by_id, record.id()),
            (&mut self.by_patient, record.patient()),
            (&mut self.by_status, record.status()),
        ] {
            index.entry(value.to_string()).or_default().insert(seq);
        }
    }

    fn unindex(&mut self, seq: u64, record: &Record) {
        for (index, value) in [
            (&mut self.by_id, record.id()),
            (&mut self.by_patient, record.patient()),
            (&mut self.by_status, record.status()),
        ] {
            if let Some(set) = index.get_mut(value) {
                set.remove(&seq);
                if set.is_empty() {
                    index.remove(value);
                }
            }
        }
    }
}
