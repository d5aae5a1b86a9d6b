//! HTTP API handlers.

use std::any::Any;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{error, warn};

use crate::error::{ApiError, ErrorBody, StoreError, MSG_INTERNAL, MSG_MISSING_FIELDS};
use crate::metrics::{inc_store_unavailable, inc_user_request, OUTCOME_OK};
use crate::store::{NewUser, Operation, Store, User, UserId, UserPayload};

/// Confirmation message after an update.
pub const MSG_UPDATED: &str = "Usuario actualizado correctamente";
/// Confirmation message after a delete.
pub const MSG_DELETED: &str = "Usuario eliminado correctamente";
/// Error message for unknown routes.
pub const MSG_ROUTE_NOT_FOUND: &str = "Ruta no encontrada";

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connectivity gate, decided at startup.
    pub store: Store,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state over a store.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    /// Serve `/metrics` from this handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether the store connection is available.
    pub ready: bool,
}

/// Confirmation body for update and delete.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: &'static str,
}

/// Record the outcome of a user operation.
fn observe<T>(operation: Operation, result: Result<T, ApiError>) -> Result<T, ApiError> {
    match &result {
        Ok(_) => inc_user_request(operation, OUTCOME_OK),
        Err(e) => {
            if matches!(e, ApiError::ServiceUnavailable) {
                warn!(%operation, "Rejected: store unavailable since startup");
                inc_store_unavailable();
            }
            inc_user_request(operation, e.kind());
        }
    }
    result
}

fn store_failure(operation: Operation) -> impl FnOnce(StoreError) -> ApiError {
    move |e| {
        error!(%operation, "Store error: {}", e);
        ApiError::from(e)
    }
}

fn validated(payload: Result<Json<UserPayload>, JsonRejection>) -> Result<NewUser, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload
        .into_new_user()
        .ok_or_else(|| ApiError::BadRequest(MSG_MISSING_FIELDS.to_string()))
}

/// Ids that do not parse cannot match a row.
fn parse_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

async fn run_list(store: &Store) -> Result<Vec<User>, ApiError> {
    let repo = store.repository()?;
    repo.list_all()
        .await
        .map_err(store_failure(Operation::List))
}

async fn run_create(
    store: &Store,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<User, ApiError> {
    let repo = store.repository()?;
    let new_user = validated(payload)?;
    repo.insert(&new_user)
        .await
        .map_err(store_failure(Operation::Create))
}

async fn run_update(
    store: &Store,
    id: &str,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<MessageResponse, ApiError> {
    let repo = store.repository()?;
    let new_user = validated(payload)?;
    let id = parse_id(id)?;
    let affected = repo
        .update_by_id(id, &new_user)
        .await
        .map_err(store_failure(Operation::Update))?;
    if affected == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(MessageResponse {
        message: MSG_UPDATED,
    })
}

async fn run_delete(store: &Store, id: &str) -> Result<MessageResponse, ApiError> {
    let repo = store.repository()?;
    let id = parse_id(id)?;
    let affected = repo
        .delete_by_id(id)
        .await
        .map_err(store_failure(Operation::Delete))?;
    if affected == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(MessageResponse {
        message: MSG_DELETED,
    })
}

/// `GET /usuarios` - list every user.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    observe(Operation::List, run_list(&state.store).await).map(Json)
}

/// `POST /usuarios` - create a user, 201 with the generated id.
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = observe(Operation::Create, run_create(&state.store, payload).await)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /usuarios/:id` - overwrite a user's fields.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    observe(Operation::Update, run_update(&state.store, &id, payload).await).map(Json)
}

/// `DELETE /usuarios/:id` - remove a user.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    observe(Operation::Delete, run_delete(&state.store, &id).await).map(Json)
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if the store is connected, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.store.is_connected();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadyResponse { ready }))
}

/// Prometheus exposition handler.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: MSG_ROUTE_NOT_FOUND.to_string(),
        }),
    )
}

/// Turn a handler panic into a 500 JSON error.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        MSG_INTERNAL.to_string()
    };

    error!("Unhandled error in request handler: {}", message);
    ApiError::InternalError(message).into_response()
}
