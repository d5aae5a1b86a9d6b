//! HTTP API route definitions.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use super::handlers::{
    create_user, delete_user, handle_panic, health, list_users, metrics, not_found, ready,
    update_user, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // User CRUD
        .route("/usuarios", get(list_users).post(create_user))
        .route("/usuarios/:id", put(update_user).delete(delete_user))
        // Operational endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
