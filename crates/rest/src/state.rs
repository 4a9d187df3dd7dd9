//! Application state for the REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the record store, the configuration, and the codec and
//! validator every outbound document passes through.

use std::sync::Arc;

use priorauth_fhir::{StructuralValidator, Validator};
use priorauth_persistence::core::RecordStorage;
use priorauth_serde::{Codec, FhirCodec};

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`RecordStorage`])
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use priorauth_persistence::backends::memory::MemoryBackend;
/// use priorauth_persistence::core::RecordStorage;
/// use priorauth_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(Arc::new(MemoryBackend::new()), ServerConfig::default());
/// assert_eq!(state.storage().backend_name(), "memory");
/// ```
pub struct AppState<S> {
    /// The record store.
    storage: Arc<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,

    /// Wire codec for responses.
    codec: Arc<dyn Codec>,

    /// Validator applied to every outbound document.
    validator: Arc<dyn Validator>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
            codec: Arc::clone(&self.codec),
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<S: RecordStorage> AppState<S> {
    /// Creates a new AppState with the default FHIR codec and structural
    /// validator.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
            codec: Arc::new(FhirCodec::new()),
            validator: Arc::new(StructuralValidator::new()),
        }
    }

    /// Replaces the codec.
    pub fn with_codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Replaces the validator.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a clone of the storage Arc.
    pub fn storage_arc(&self) -> Arc<S> {
        Arc::clone(&self.storage)
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the codec.
    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }

    /// Returns the validator.
    pub fn validator(&self) -> &dyn Validator {
        self.validator.as_ref()
    }

    /// Returns the base URL for the server.
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Returns whether searches must name an owning patient.
    pub fn require_patient(&self) -> bool {
        self.config.require_patient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use priorauth_fhir::ValidationOutcome;
    use priorauth_persistence::backends::memory::MemoryBackend;
    use serde_json::{Value, json};

    struct RejectAll;

    impl Validator for RejectAll {
        fn validate(&self, _resource: &Value) -> ValidationOutcome {
            ValidationOutcome {
                resource_type: None,
                issues: vec![priorauth_fhir::Issue::error(
                    priorauth_fhir::IssueType::Invalid,
                    "rejected",
                )],
            }
        }
    }

    #[test]
    fn test_app_state_creation() {
        let storage = Arc::new(MemoryBackend::new());
        let config = ServerConfig {
            base_url: "http://pa.example.org/".to_string(),
            ..Default::default()
        };
        let state = AppState::new(storage, config);

        assert_eq!(state.base_url(), "http://pa.example.org");
        assert!(!state.require_patient());
        assert!(
            !state
                .validator()
                .validate(&json!({"resourceType": "Claim"}))
                .is_valid()
        );
    }

    #[test]
    fn test_app_state_clone_shares_storage() {
        let state = AppState::new(Arc::new(MemoryBackend::new()), ServerConfig::default());
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.storage_arc(), &cloned.storage_arc()));
    }

    #[test]
    fn test_with_validator() {
        let state = AppState::new(Arc::new(MemoryBackend::new()), ServerConfig::default())
            .with_validator(RejectAll);
        let outcome = state.validator().validate(&json!({}));
        assert!(!outcome.is_valid());
    }
}
