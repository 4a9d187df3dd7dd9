//! Error types for the persistence layer.
//!
//! Callers distinguish three failure families: a lookup that did not name a
//! complete key, a write whose input cannot become a record, and a fault in
//! the backend itself.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use priorauth_fhir::ResourceType;
use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A keyed read did not supply both `id` and `patient`.
    #[error("incomplete key for {resource_type}: constraints must include {missing}")]
    IncompleteKey {
        resource_type: ResourceType,
        missing: &'static str,
    },

    /// Write input that cannot be stored.
    #[error("invalid {resource_type} record: {message}")]
    InvalidRecord {
        resource_type: ResourceType,
        message: String,
    },

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors originating in a storage backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StorageError {
    /// Returns true for faults that may clear without caller action.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Backend(BackendError::Unavailable { .. }))
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::IncompleteKey {
            resource_type: ResourceType::Claim,
            missing: "patient",
        };
        assert_eq!(
            err.to_string(),
            "incomplete key for Claim: constraints must include patient"
        );

        let err = StorageError::InvalidRecord {
            resource_type: ResourceType::Bundle,
            message: "id must not be empty".to_string(),
        };
        assert_eq!(err.to_string(), "invalid Bundle record: id must not be empty");
    }

    #[test]
    fn test_backend_error_is_transparent() {
        let err: StorageError = BackendError::Unavailable {
            backend_name: "memory".to_string(),
            message: "closed".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "backend unavailable: memory: closed");
        assert!(err.is_transient());

        let err: StorageError = BackendError::Internal {
            backend_name: "memory".to_string(),
            message: "index out of sync".to_string(),
            source: None,
        }
        .into();
        assert!(!err.is_transient());
    }
}
