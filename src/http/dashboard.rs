//! Dashboard endpoint.

use super::{ApiResult, AppState, require_identity};
use crate::core::dashboard::{self, DashboardStats};
use axum::extract::{Json, State};
use axum::http::HeaderMap;
use chrono::Utc;

/// `GET /dashboard` - the owner's summary statistics for the current month.
#[tracing::instrument(skip(state, headers))]
pub async fn stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<DashboardStats>> {
    let identity = require_identity(&state, &headers).await?;
    let today = Utc::now().date_naive();
    let stats = dashboard::owner_dashboard(&state.db, &identity, today).await?;
    Ok(Json(stats))
}
