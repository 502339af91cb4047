//! Payment endpoints - submission, verification, and both listings.

use super::{ApiResult, AppState, require_identity};
use crate::core::rent::{self, PaymentDecision, PaymentWithTenant, SubmitPayment};
use crate::entities::payment::Model as PaymentModel;
use crate::errors::Error;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use serde::Deserialize;

/// Body of `POST /payments`.
#[derive(Debug, Deserialize)]
pub struct SubmitPaymentRequest {
    /// Month being paid for; any day within the month
    pub billing_month: NaiveDate,
    /// Amount transferred, in whole rupiah
    pub amount: i64,
    /// Base64-encoded proof-of-transfer image
    pub proof_base64: String,
    /// MIME type of the proof image
    #[serde(default = "default_proof_content_type")]
    pub proof_content_type: String,
}

fn default_proof_content_type() -> String {
    "image/jpeg".to_string()
}

/// Body of `POST /payments/{id}/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    /// The owner's decision
    pub decision: PaymentDecision,
}

/// `POST /payments` - tenant submits a rent payment with proof.
#[tracing::instrument(skip(state, headers, payload))]
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SubmitPaymentRequest>,
) -> ApiResult<(StatusCode, Json<PaymentModel>)> {
    let identity = require_identity(&state, &headers).await?;

    let proof = STANDARD
        .decode(payload.proof_base64.as_bytes())
        .map_err(|e| Error::Validation {
            field: "proof_base64",
            message: format!("proof image is not valid base64: {e}"),
        })?;

    let created = rent::submit_payment(
        &state.db,
        state.blob.as_ref(),
        &identity,
        SubmitPayment {
            billing_month: payload.billing_month,
            amount: payload.amount,
            proof,
            proof_content_type: payload.proof_content_type,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// `POST /payments/{id}/verify` - owner accepts or rejects a payment.
#[tracing::instrument(skip(state, headers, payload))]
pub async fn verify(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<VerifyPaymentRequest>,
) -> ApiResult<Json<PaymentModel>> {
    let identity = require_identity(&state, &headers).await?;
    let updated =
        rent::verify_payment(&state.db, &identity, payment_id, payload.decision).await?;
    Ok(Json(updated))
}

/// `GET /payments` - every payment across the owner's tenants, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn list_for_owner(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<PaymentWithTenant>>> {
    let identity = require_identity(&state, &headers).await?;
    let payments = rent::list_payments_for_owner(&state.db, &identity).await?;
    Ok(Json(payments))
}

/// `GET /payments/mine` - the calling tenant's own payment history.
#[tracing::instrument(skip(state, headers))]
pub async fn list_mine(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<PaymentModel>>> {
    let identity = require_identity(&state, &headers).await?;
    let payments = rent::list_payments_for_tenant(&state.db, &identity).await?;
    Ok(Json(payments))
}
