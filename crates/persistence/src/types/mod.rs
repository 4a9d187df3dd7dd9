//! Core types for stored records and lookups.

mod constraints;
mod record;

pub use constraints::{Attribute, Constraints};
pub use record::{NewRecord, Record};
