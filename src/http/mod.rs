//! HTTP layer - axum router, shared state, and error mapping.
//!
//! This is a thin presentation layer: every handler resolves the caller's
//! identity from the `Authorization: Bearer` header and hands off to
//! [`crate::core`]. Domain errors map onto HTTP statuses here and nowhere
//! else.

/// Complaint endpoints
pub mod complaints;
/// Dashboard endpoint
pub mod dashboard;
/// Notification endpoints
pub mod notifications;
/// Payment endpoints
pub mod payments;
/// Room endpoints
pub mod rooms;
/// Tenant endpoints
pub mod tenants;
/// Image upload endpoint
pub mod uploads;

use crate::auth::{self, Identity};
use crate::blob::FsBlobStore;
use crate::config::AppConfig;
use crate::errors::Error;
use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::extract::Json;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub db: DatabaseConnection,
    /// Blob store uploads go to
    pub blob: Arc<FsBlobStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

/// Error wrapper carrying a domain error across the handler boundary.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

/// Handler result type used throughout this layer.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            Error::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            Error::Unauthorized { .. } => (StatusCode::FORBIDDEN, "UNAUTHORIZED"),
            Error::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION"),
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            Error::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            Error::Dependency { .. } => (StatusCode::BAD_GATEWAY, "DEPENDENCY"),
            Error::Database(_) | Error::Io(_) | Error::Config { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL")
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "internal error");
            "internal error".to_string()
        } else {
            self.0.to_string()
        };

        (
            status,
            Json(serde_json::json!({ "error": kind, "message": message })),
        )
            .into_response()
    }
}

/// Resolves the caller's identity from the `Authorization` header.
pub async fn require_identity(state: &AppState, headers: &HeaderMap) -> ApiResult<Identity> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(Error::Unauthenticated)?;

    auth::authenticate(&state.db, token).await.map_err(Into::into)
}

async fn health() -> &'static str {
    "ok"
}

/// Builds the application router over the given state.
pub fn router(state: AppState) -> Router {
    let serve_uploads = ServeDir::new(&state.config.upload_dir);
    let upload_base_url = state.config.upload_base_url.clone();

    Router::new()
        .route("/health", get(health))
        .route("/rooms", get(rooms::list).post(rooms::create))
        .route("/rooms/:id", patch(rooms::update).delete(rooms::remove))
        .route("/tenants", get(tenants::list).post(tenants::onboard))
        .route("/tenants/:id/archive", post(tenants::archive))
        .route(
            "/payments",
            get(payments::list_for_owner).post(payments::submit),
        )
        .route("/payments/mine", get(payments::list_mine))
        .route("/payments/:id/verify", post(payments::verify))
        .route(
            "/complaints",
            get(complaints::list_for_owner).post(complaints::file),
        )
        .route("/complaints/mine", get(complaints::list_mine))
        .route("/complaints/:id/advance", post(complaints::advance))
        .route("/notifications", get(notifications::list))
        .route("/notifications/:id/read", post(notifications::mark_read))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/dashboard", get(dashboard::stats))
        .route("/uploads", post(uploads::upload))
        .nest_service(&upload_base_url, serve_uploads)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
