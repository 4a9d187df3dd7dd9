//! REST API test harness.

use std::sync::Arc;

use axum_test::TestServer;
use priorauth_fhir::ResourceType;
use priorauth_persistence::backends::memory::MemoryBackend;
use priorauth_persistence::core::RecordStorage;
use priorauth_persistence::types::NewRecord;
use priorauth_rest::{AppState, ServerConfig};
use serde_json::Value;

use super::fixtures::claim_minimal;

/// Base URL used by every test server.
pub const BASE_URL: &str = "http://localhost:8080";

/// Test configuration.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        base_url: BASE_URL.to_string(),
        ..ServerConfig::for_testing()
    }
}

/// Creates a test server over `backend` with the bare routes.
pub fn create_test_server<S>(backend: Arc<S>, config: ServerConfig) -> TestServer
where
    S: RecordStorage + Send + Sync + 'static,
{
    let state = AppState::new(backend, config);
    let app = priorauth_rest::routing::fhir_routes::create_routes(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Stores `document` under `(id, patient)`.
pub async fn seed(
    backend: &MemoryBackend,
    resource_type: ResourceType,
    patient: &str,
    document: Value,
) {
    let id = document["id"]
        .as_str()
        .expect("seeded documents carry an id")
        .to_string();
    backend
        .write(resource_type, NewRecord::new(id, patient, document))
        .await
        .expect("Failed to seed record");
}

/// A backend holding the `minimal` Claim for patient `1`, and a server over it.
pub async fn seeded_server() -> (TestServer, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    seed(&backend, ResourceType::Claim, "1", claim_minimal()).await;
    let server = create_test_server(Arc::clone(&backend), test_config());
    (server, backend)
}
