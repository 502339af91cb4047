//! Notification endpoints - feed and read flags.

use super::{ApiResult, AppState, require_identity};
use crate::core::notification::{self, NotificationFeed};
use crate::entities::notification::Model as NotificationModel;
use axum::extract::{Json, Path, State};
use axum::http::HeaderMap;
use serde::Serialize;

/// Body of the `POST /notifications/read-all` response.
#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    /// How many notifications were flipped to read
    pub marked: u64,
}

/// `GET /notifications` - the owner's 20 newest notifications plus the
/// unread count.
#[tracing::instrument(skip(state, headers))]
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<NotificationFeed>> {
    let identity = require_identity(&state, &headers).await?;
    let feed = notification::list_notifications(&state.db, &identity).await?;
    Ok(Json(feed))
}

/// `POST /notifications/{id}/read` - mark one notification as read.
#[tracing::instrument(skip(state, headers))]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<i64>,
    headers: HeaderMap,
) -> ApiResult<Json<NotificationModel>> {
    let identity = require_identity(&state, &headers).await?;
    let updated = notification::mark_read(&state.db, &identity, notification_id).await?;
    Ok(Json(updated))
}

/// `POST /notifications/read-all` - mark every unread notification as read.
#[tracing::instrument(skip(state, headers))]
pub async fn mark_all_read(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<MarkAllReadResponse>> {
    let identity = require_identity(&state, &headers).await?;
    let marked = notification::mark_all_read(&state.db, &identity).await?;
    Ok(Json(MarkAllReadResponse { marked }))
}
