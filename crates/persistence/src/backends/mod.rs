//! Storage backend implementations.
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`memory`] | Indexed in-memory tables, one per resource type |
//!
//! # Example
//!
//! ```
//! use priorauth_persistence::backends::memory::MemoryBackend;
//! use priorauth_persistence::core::RecordStorage;
//!
//! let backend = MemoryBackend::new();
//! assert_eq!(backend.backend_name(), "memory");
//! ```

pub mod memory;
