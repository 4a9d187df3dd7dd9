//! Request inspection shared by the handlers.

pub mod content_type;

pub use content_type::negotiate_format;
