//! Prior Authorization Record Store
//!
//! This crate provides the constrained record store behind the prior
//! authorization service: clinical documents keyed by resource type and
//! `(id, patient)`, indexed by `id`, `patient`, and a `status` derived from
//! document content, and queried by exact-match constraint maps.
//!
//! # Architecture
//!
//! - [`types`] - [`Record`](types::Record), [`NewRecord`](types::NewRecord), and
//!   [`Constraints`](types::Constraints)
//! - [`error`] - Error types for all operations
//! - [`core`] - The [`RecordStorage`](core::RecordStorage) trait
//! - [`backends`] - Backend implementations
//!
//! # Quick Start
//!
//! ```
//! use priorauth_fhir::ResourceType;
//! use priorauth_persistence::backends::memory::MemoryBackend;
//! use priorauth_persistence::core::RecordStorage;
//! use priorauth_persistence::types::{Constraints, NewRecord};
//! use serde_json::json;
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let store = MemoryBackend::new();
//! let claim = json!({"resourceType": "Claim", "status": "active"});
//! store.write(ResourceType::Claim, NewRecord::new("minimal", "1", claim)).await.unwrap();
//!
//! let owned_by_1 = store
//!     .read_all(ResourceType::Claim, &Constraints::new().with_patient("1"))
//!     .await
//!     .unwrap();
//! assert_eq!(owned_by_1.len(), 1);
//! assert_eq!(owned_by_1[0].id(), "minimal");
//! # });
//! ```

#![warn(missing_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod types;

pub use error::{BackendError, StorageError, StorageResult};
