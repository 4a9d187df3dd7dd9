//! # priorauth-rest - record service REST surface
//!
//! Serves prior authorization records held in a
//! [`RecordStorage`](priorauth_persistence::core::RecordStorage) over HTTP,
//! in FHIR JSON or FHIR XML. Every outbound document is validated before it
//! is serialized; an invalid document is reported as an error, never sent.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use priorauth_persistence::backends::memory::MemoryBackend;
//! use priorauth_rest::{ServerConfig, create_app_with_config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(MemoryBackend::new(), config.clone());
//!
//!     let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |------------|-------------|-------------|
//! | search | GET | `/[type]?patient.identifier=[owner]` |
//! | fetch | GET | `/[type]?identifier=[id]&patient.identifier=[owner]` |
//! | delete | DELETE | `/[type]?identifier=[id]&patient.identifier=[owner]` |
//! | health | GET | `/health` |
//!
//! `[type]` is one of `Claim`, `ClaimResponse`, or `Bundle`. A `status`
//! parameter further filters searches and fetches.
//!
//! ## Content Negotiation
//!
//! The `_format` query parameter (`json`, `xml`, or a MIME type) takes
//! precedence over the `Accept` header. JSON is the default. Every response
//! carries `Access-Control-Allow-Origin: *`.
//!
//! ## Error Handling
//!
//! All errors are returned as FHIR
//! [OperationOutcome](https://hl7.org/fhir/operationoutcome.html) resources;
//! see [`error`] for the status code mapping.
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`error`] - Error types and OperationOutcome generation
//! - [`extractors`] - Query string parsing into store constraints
//! - [`handlers`] - Search, fetch, delete, and health handlers
//! - [`middleware`] - Content negotiation
//! - [`responses`] - Envelope building, headers, serialization
//! - [`routing`] - Route configuration
//! - [`seed`] - Startup loading of fixture documents
//! - [`state`] - Application state (store, codec, validator, configuration)

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod routing;
pub mod seed;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use seed::{SeedError, seed_store};
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{Method, StatusCode};
use priorauth_persistence::core::RecordStorage;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`] or
/// [`create_app_with_state`].
pub fn create_app<S>(storage: S) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    create_app_with_state(AppState::new(Arc::new(storage), config))
}

/// Creates the Axum application around an existing state.
///
/// Use this when the caller keeps its own handle on the store, for example
/// to close it on shutdown.
pub fn create_app_with_state<S>(state: AppState<S>) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    let config = state.config().clone();
    info!(
        backend = state.storage().backend_name(),
        base_url = %config.base_url(),
        require_patient = config.require_patient,
        "Creating REST API server"
    );

    let router = routing::fhir_routes::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer())
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer answering preflight requests from any origin.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG`, when set,
/// overrides `level`.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "priorauth_server={level},priorauth_rest={level},priorauth_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
