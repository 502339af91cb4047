//! Image upload endpoint.
//!
//! Lets a client (owner or tenant) store an image ahead of the operation
//! that references it - the identity-card photo passed to onboarding is the
//! main user. Payment proofs and complaint photos travel inline with their
//! own endpoints instead, so their upload can be ordered before the record
//! write.

use super::{ApiResult, AppState, require_identity};
use crate::blob::BlobStore;
use crate::errors::Error;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Body of `POST /uploads`.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    /// Base64-encoded file content
    pub data_base64: String,
    /// MIME type of the content
    pub content_type: String,
}

/// Response of `POST /uploads`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// URL the stored file can be fetched from
    pub url: String,
}

/// `POST /uploads` - store an image, get back its URL.
#[tracing::instrument(skip(state, headers, payload))]
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UploadRequest>,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    require_identity(&state, &headers).await?;

    let bytes = STANDARD
        .decode(payload.data_base64.as_bytes())
        .map_err(|e| Error::Validation {
            field: "data_base64",
            message: format!("file content is not valid base64: {e}"),
        })?;
    if bytes.is_empty() {
        return Err(Error::Validation {
            field: "data_base64",
            message: "file content cannot be empty".to_string(),
        }
        .into());
    }

    let url = state.blob.store(&bytes, &payload.content_type).await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}
