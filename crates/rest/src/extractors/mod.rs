//! Axum extractors for record requests.
//!
//! - [`RecordQuery`] - Constraints and response format from the query string

mod search_params;

pub use search_params::{FORMAT_PARAMETER, RECORD_PARAMETERS, RecordQuery};
