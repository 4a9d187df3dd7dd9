//! Record route configuration.

use axum::{Router, routing::get};
use priorauth_persistence::core::RecordStorage;

use crate::handlers;
use crate::state::AppState;

/// Creates all record service routes.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `GET /{type}` - Search, or fetch when the query names a single record
/// - `DELETE /{type}` - Delete the record named by the query
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(handlers::health_handler::<S>))
        .route(
            "/{resource_type}",
            get(handlers::search_get_handler::<S>).delete(handlers::delete_handler::<S>),
        )
        .with_state(state)
}
