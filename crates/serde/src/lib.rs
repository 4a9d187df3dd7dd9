//! # priorauth-serde
//!
//! JSON and XML serialization for the FHIR documents held by the prior
//! authorization record service.
//!
//! ## Features
//!
//! - **JSON Support**: thin wrappers around `serde_json`.
//! - **XML Support**: FHIR XML written and read with quick-xml, guided by the
//!   element model in `priorauth-fhir` so that arrays and typed primitives
//!   survive the round trip.
//! - **Codec seam**: the [`Codec`] trait lets the REST layer serialize by
//!   negotiated [`Format`] without knowing about either representation.
//!
//! ```
//! use priorauth_serde::{Codec, FhirCodec, Format};
//! use serde_json::json;
//!
//! let codec = FhirCodec::new();
//! let claim = json!({"resourceType": "Claim", "id": "minimal", "status": "active"});
//! let xml = codec.serialize(&claim, Format::Xml).unwrap();
//! assert_eq!(codec.deserialize(&xml, Format::Xml).unwrap(), claim);
//! ```

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod format;
pub mod json;
pub mod xml;

pub use codec::{Codec, FhirCodec};
pub use error::{Result, SerdeError};
pub use format::Format;
