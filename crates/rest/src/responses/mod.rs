//! Response formatting for the REST API.
//!
//! - [`bundle`] - Searchset envelope building
//! - [`format`] - Serialization in the negotiated format
//! - [`headers`] - Response header generation

pub mod bundle;
pub mod format;
pub mod headers;

pub use bundle::{BundleBuilder, BundleEntry, BundleLink, record_url};
pub use format::format_resource_response;
pub use headers::ResourceHeaders;
