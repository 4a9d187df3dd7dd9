//! Response header generation.

use axum::http::{HeaderMap, HeaderValue, header};
use priorauth_persistence::types::Record;
use priorauth_serde::Format;

/// Builder for record response headers.
///
/// Every response carries `Content-Type` for the negotiated format and
/// `Access-Control-Allow-Origin: *`. Single-record responses also carry
/// `Last-Modified`.
#[derive(Debug, Default)]
pub struct ResourceHeaders {
    /// Negotiated format.
    format: Format,
    /// Last-Modified timestamp.
    last_modified: Option<String>,
}

impl ResourceHeaders {
    /// Creates headers for a response in `format`.
    pub fn new(format: Format) -> Self {
        Self {
            format,
            last_modified: None,
        }
    }

    /// Creates headers for a single stored record.
    pub fn from_record(record: &Record, format: Format) -> Self {
        Self::new(format).with_last_modified(
            record
                .timestamp()
                .format("%a, %d %b %Y %H:%M:%S GMT")
                .to_string(),
        )
    }

    /// Sets the Last-Modified timestamp.
    pub fn with_last_modified(mut self, timestamp: impl Into<String>) -> Self {
        self.last_modified = Some(timestamp.into());
        self
    }

    /// Converts to an Axum HeaderMap.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(self.format.mime_type()),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );

        if let Some(last_modified) = &self.last_modified {
            if let Ok(value) = HeaderValue::from_str(last_modified) {
                headers.insert(header::LAST_MODIFIED, value);
            }
        }

        headers
    }
}
