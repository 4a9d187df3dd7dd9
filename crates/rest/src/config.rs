//! Server configuration for the record service.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PRIORAUTH_PORT` | 8080 | Server port |
//! | `PRIORAUTH_HOST` | 127.0.0.1 | Host to bind |
//! | `PRIORAUTH_LOG_LEVEL` | info | Log level |
//! | `PRIORAUTH_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `PRIORAUTH_ENABLE_CORS` | true | Answer CORS preflight requests |
//! | `PRIORAUTH_BASE_URL` | http://localhost:8080 | Base URL used in Bundle links |
//! | `PRIORAUTH_REQUIRE_PATIENT` | false | Reject searches without `patient.identifier` |
//! | `PRIORAUTH_SEED_DIR` | (none) | Directory of documents loaded at startup |
//!
//! # Example
//!
//! ```rust
//! use priorauth_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     require_patient: true,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Server configuration for the record service.
///
/// Constructed from command line arguments and environment variables with
/// [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "priorauth")]
#[command(about = "Prior authorization record service")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "PRIORAUTH_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "PRIORAUTH_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "PRIORAUTH_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "PRIORAUTH_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Answer CORS preflight requests.
    #[arg(
        long,
        env = "PRIORAUTH_ENABLE_CORS",
        default_value = "true",
        action = clap::ArgAction::Set
    )]
    pub enable_cors: bool,

    /// Base URL for the server (used in Bundle links and entry fullUrls).
    #[arg(long, env = "PRIORAUTH_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Reject searches that do not name an owning patient.
    #[arg(long, env = "PRIORAUTH_REQUIRE_PATIENT", default_value = "false")]
    pub require_patient: bool,

    /// Directory of `<Type>/<patient>/<id>.json` documents to load at startup.
    #[arg(long, env = "PRIORAUTH_SEED_DIR")]
    pub seed_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            base_url: "http://localhost:8080".to_string(),
            require_patient: false,
            seed_dir: None,
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            errors.push(format!("Base URL '{}' is not a valid URL", self.base_url));
        }

        if let Some(dir) = &self.seed_dir {
            if !dir.is_dir() {
                errors.push(format!("Seed directory {} does not exist", dir.display()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and a short request timeout.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            base_url: "http://localhost:8080".to_string(),
            require_patient: false,
            seed_dir: None,
        }
    }
}
