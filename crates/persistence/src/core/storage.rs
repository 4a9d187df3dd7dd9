//! Core record storage trait.
//!
//! This module defines the [`RecordStorage`] trait: a store of clinical
//! documents keyed by resource type and `(id, patient)`, queried by exact-match
//! [`Constraints`].

use async_trait::async_trait;
use priorauth_fhir::ResourceType;

use crate::error::StorageResult;
use crate::types::{Constraints, NewRecord, Record};

/// Storage contract for prior authorization records.
///
/// # Keys
///
/// Within a resource type, `(id, patient)` identifies at most one live
/// record. Writing an existing key replaces the record in full.
///
/// # Consistency
///
/// Writes and deletes are atomically visible: a concurrent read observes the
/// old record or the new one, never a mix.
///
/// # Example
///
/// ```
/// use priorauth_fhir::ResourceType;
/// use priorauth_persistence::backends::memory::MemoryBackend;
/// use priorauth_persistence::core::RecordStorage;
/// use priorauth_persistence::types::{Constraints, NewRecord};
/// use serde_json::json;
///
/// # tokio_test_block(async {
/// let store = MemoryBackend::new();
/// let claim = json!({"resourceType": "Claim", "status": "active"});
/// store
///     .write(ResourceType::Claim, NewRecord::new("minimal", "1", claim))
///     .await
///     .unwrap();
///
/// let found = store
///     .read(ResourceType::Claim, &Constraints::for_key("minimal", "1"))
///     .await
///     .unwrap()
///     .unwrap();
/// assert_eq!(found.status(), "active");
/// assert_eq!(found.document()["id"], "minimal");
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Inserts or replaces the record keyed by `(record.id, record.patient)`.
    ///
    /// The status attribute is derived from the document. A document without
    /// an `id` gets the record id.
    ///
    /// # Errors
    ///
    /// * `StorageError::InvalidRecord` - empty id or patient, a document that is
    ///   not an object, or a `resourceType` that disagrees with `resource_type`
    /// * `StorageError::Backend` - the backend is unavailable
    async fn write(&self, resource_type: ResourceType, record: NewRecord) -> StorageResult<Record>;

    /// Reads the single record named by the `id` and `patient` constraints.
    ///
    /// Any further constraints filter the keyed record.
    ///
    /// # Errors
    ///
    /// * `StorageError::IncompleteKey` - `id` or `patient` is missing
    async fn read(
        &self,
        resource_type: ResourceType,
        constraints: &Constraints,
    ) -> StorageResult<Option<Record>>;

    /// Reads every record matching all constraints, in insertion order.
    ///
    /// Replacing a record keeps its original position.
    async fn read_all(
        &self,
        resource_type: ResourceType,
        constraints: &Constraints,
    ) -> StorageResult<Vec<Record>>;

    /// Deletes the record keyed by `(id, patient)`.
    ///
    /// Returns whether a record was removed; deleting an absent key is not an
    /// error.
    async fn delete(&self, resource_type: ResourceType, id: &str, patient: &str)
    -> StorageResult<bool>;

    /// Returns the number of live records of a type.
    async fn count(&self, resource_type: ResourceType) -> StorageResult<usize>;

    /// Shuts the store down. Every later operation fails as unavailable.
    async fn close(&self) -> StorageResult<()>;
}
