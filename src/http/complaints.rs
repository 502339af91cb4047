//! Complaint endpoints - filing, triage, and both listings.

use super::{ApiResult, AppState, require_identity};
use crate::core::complaint::{self, ComplaintWithTenant, FileComplaint};
use crate::entities::ComplaintStatus;
use crate::entities::complaint::Model as ComplaintModel;
use crate::errors::Error;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

/// Body of `POST /complaints`.
#[derive(Debug, Deserialize)]
pub struct FileComplaintRequest {
    /// Short summary of the issue
    pub title: String,
    /// Full description of the issue
    pub description: String,
    /// Optional base64-encoded supporting photo
    pub photo_base64: Option<String>,
    /// MIME type of the photo, when one is attached
    pub photo_content_type: Option<String>,
}

/// Body of `POST /complaints/{id}/advance`.
#[derive(Debug, Deserialize)]
pub struct AdvanceComplaintRequest {
    /// The status to advance to; must be the next step
    pub status: ComplaintStatus,
}

/// `POST /complaints` - tenant files a complaint.
#[tracing::instrument(skip(state, headers, payload))]
pub async fn file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<FileComplaintRequest>,
) -> ApiResult<(StatusCode, Json<ComplaintModel>)> {
    let identity = require_identity(&state, &headers).await?;

    let photo = payload
        .photo_base64
        .map(|encoded| {
            STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| Error::Validation {
                    field: "photo_base64",
                    message: format!("photo is not valid base64: {e}"),
                })
        })
        .transpose()?;

    let created = complaint::file_complaint(
        &state.db,
        state.blob.as_ref(),
        &identity,
        FileComplaint {
            title: payload.title,
            description: payload.description,
            photo,
            photo_content_type: payload.photo_content_type,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// `POST /complaints/{id}/advance` - owner moves a complaint one step.
#[tracing::instrument(skip(state, headers, payload))]
pub async fn advance(
    State(state): State<AppState>,
    Path(complaint_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<AdvanceComplaintRequest>,
) -> ApiResult<Json<ComplaintModel>> {
    let identity = require_identity(&state, &headers).await?;
    let updated =
        complaint::advance_complaint(&state.db, &identity, complaint_id, payload.status).await?;
    Ok(Json(updated))
}

/// `GET /complaints` - every complaint across the owner's tenants.
#[tracing::instrument(skip(state, headers))]
pub async fn list_for_owner(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<ComplaintWithTenant>>> {
    let identity = require_identity(&state, &headers).await?;
    let complaints = complaint::list_complaints_for_owner(&state.db, &identity).await?;
    Ok(Json(complaints))
}

/// `GET /complaints/mine` - the calling tenant's own complaints.
#[tracing::instrument(skip(state, headers))]
pub async fn list_mine(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<ComplaintModel>>> {
    let identity = require_identity(&state, &headers).await?;
    let complaints = complaint::list_complaints_for_tenant(&state.db, &identity).await?;
    Ok(Json(complaints))
}
