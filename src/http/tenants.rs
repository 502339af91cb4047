//! Tenant endpoints - listing, onboarding, offboarding.

use super::{ApiResult, AppState, require_identity};
use crate::core::tenancy::{self, OnboardTenant, OnboardingResult, TenantSummary};
use crate::entities::tenant::Model as TenantModel;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};

/// `GET /tenants` - the owner's active tenants, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<TenantSummary>>> {
    let identity = require_identity(&state, &headers).await?;
    let tenants = tenancy::list_active_tenants(&state.db, &identity).await?;
    Ok(Json(tenants))
}

/// `POST /tenants` - onboard a tenant into an empty room.
///
/// The response carries the one-time invitation token for the tenant's new
/// login; it is never retrievable again.
#[tracing::instrument(skip(state, headers, payload))]
pub async fn onboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<OnboardTenant>,
) -> ApiResult<(StatusCode, Json<OnboardingResult>)> {
    let identity = require_identity(&state, &headers).await?;
    let result = tenancy::onboard_tenant(&state.db, &identity, payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// `POST /tenants/{id}/archive` - offboard a tenant and free the room.
#[tracing::instrument(skip(state, headers))]
pub async fn archive(
    State(state): State<AppState>,
    Path(tenant_id): Path<i64>,
    headers: HeaderMap,
) -> ApiResult<Json<TenantModel>> {
    let identity = require_identity(&state, &headers).await?;
    let archived = tenancy::offboard_tenant(&state.db, &identity, tenant_id).await?;
    Ok(Json(archived))
}
