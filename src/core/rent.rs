//! Rent ledger - payment submission and verification.
//!
//! A submission stores its proof image first and only then opens the ledger
//! transaction, so a blob-store failure can never leave an orphaned payment
//! row. A billing month with a PENDING or VERIFIED payment cannot be
//! resubmitted; a REJECTED month can.

use crate::auth::{self, Identity};
use crate::blob::BlobStore;
use crate::core::notification::notify_owner;
use crate::entities::{
    NotificationKind, Payment, PaymentStatus, Room, Tenant, payment, room, tenant,
};
use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument};

/// A tenant's rent submission.
#[derive(Debug, Clone)]
pub struct SubmitPayment {
    /// Month being paid for; any day within the month is accepted and
    /// normalized to the first
    pub billing_month: NaiveDate,
    /// Amount transferred, in whole rupiah
    pub amount: i64,
    /// Proof-of-transfer image bytes
    pub proof: Vec<u8>,
    /// MIME type of the proof image
    pub proof_content_type: String,
}

/// The owner's decision on a pending payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentDecision {
    /// Accept the payment; sets the verification timestamp
    Verified,
    /// Decline the payment; clears any verification timestamp
    Rejected,
}

/// A payment annotated with tenant name and room number for owner listings.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentWithTenant {
    /// The payment itself
    pub payment: payment::Model,
    /// Full name of the submitting tenant
    pub tenant_name: String,
    /// Room number of the submitting tenant, if the room still exists
    pub room_number: Option<String>,
}

fn normalize_billing_month(date: NaiveDate) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).ok_or_else(|| Error::Validation {
        field: "billing_month",
        message: format!("'{date}' is not a valid billing month"),
    })
}

/// Submits a rent payment for a billing month, storing the proof image and
/// creating a PENDING ledger entry. Raises a payment notification for the
/// owner in the same transaction.
#[instrument(skip(db, blob, identity, input), fields(billing_month = %input.billing_month))]
pub async fn submit_payment<B: BlobStore>(
    db: &DatabaseConnection,
    blob: &B,
    identity: &Identity,
    input: SubmitPayment,
) -> Result<payment::Model> {
    let tenant = auth::require_tenant(db, identity).await?;

    if input.amount <= 0 {
        return Err(Error::Validation {
            field: "amount",
            message: "payment amount must be positive".to_string(),
        });
    }
    if input.proof.is_empty() {
        return Err(Error::Validation {
            field: "proof",
            message: "a proof-of-transfer image is required".to_string(),
        });
    }
    let billing_month = normalize_billing_month(input.billing_month)?;

    let blocking = Payment::find()
        .filter(payment::Column::TenantId.eq(tenant.id))
        .filter(payment::Column::BillingMonth.eq(billing_month))
        .filter(payment::Column::Status.is_in([PaymentStatus::Pending, PaymentStatus::Verified]))
        .one(db)
        .await?;
    if let Some(existing) = blocking {
        return Err(Error::Conflict {
            message: format!(
                "a {} payment for {} already exists",
                match existing.status {
                    PaymentStatus::Pending => "pending",
                    _ => "verified",
                },
                billing_month.format("%B %Y")
            ),
        });
    }

    // Upload before the transaction: a failed upload leaves no orphan row
    let proof_url = blob.store(&input.proof, &input.proof_content_type).await?;

    let txn = db.begin().await?;

    let created = payment::ActiveModel {
        tenant_id: Set(tenant.id),
        billing_month: Set(billing_month),
        amount: Set(input.amount),
        proof_url: Set(proof_url),
        status: Set(PaymentStatus::Pending),
        uploaded_at: Set(Utc::now()),
        verified_at: Set(None),
        ..Default::default()
    };
    let created = created.insert(&txn).await?;

    notify_owner(
        &txn,
        tenant.owner_id,
        NotificationKind::PaymentSubmitted,
        "Payment submitted",
        format!(
            "{} submitted a payment for {}",
            tenant.full_name,
            billing_month.format("%B %Y")
        ),
    )
    .await?;

    txn.commit().await?;

    info!(payment_id = created.id, "payment submitted");
    Ok(created)
}

/// Applies the owner's verification decision to a payment.
///
/// `verified_at` is set iff the resulting status is VERIFIED: re-verifying
/// refreshes the timestamp, rejecting a verified payment clears it.
#[instrument(skip(db, identity))]
pub async fn verify_payment(
    db: &DatabaseConnection,
    identity: &Identity,
    payment_id: i64,
    decision: PaymentDecision,
) -> Result<payment::Model> {
    let owner = auth::require_owner(db, identity).await?;

    let found = Payment::find_by_id(payment_id)
        .find_also_related(Tenant)
        .one(db)
        .await?;
    let payment = match found {
        Some((payment, Some(tenant))) if tenant.owner_id == owner.id => payment,
        _ => {
            return Err(Error::NotFound {
                entity: "payment",
                id: payment_id.to_string(),
            });
        }
    };

    let mut active_model: payment::ActiveModel = payment.into();
    match decision {
        PaymentDecision::Verified => {
            active_model.status = Set(PaymentStatus::Verified);
            active_model.verified_at = Set(Some(Utc::now()));
        }
        PaymentDecision::Rejected => {
            active_model.status = Set(PaymentStatus::Rejected);
            active_model.verified_at = Set(None);
        }
    }

    let updated = active_model.update(db).await?;
    info!(payment_id, ?decision, "payment decision applied");
    Ok(updated)
}

/// Lists every payment across the owner's tenants, newest submission first,
/// annotated with tenant name and room number.
#[instrument(skip(db, identity))]
pub async fn list_payments_for_owner(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<PaymentWithTenant>> {
    let owner = auth::require_owner(db, identity).await?;

    let rows = Payment::find()
        .find_also_related(Tenant)
        .filter(tenant::Column::OwnerId.eq(owner.id))
        .order_by_desc(payment::Column::UploadedAt)
        .order_by_desc(payment::Column::Id)
        .all(db)
        .await?;

    let room_ids: Vec<i64> = rows
        .iter()
        .filter_map(|(_, t)| t.as_ref().and_then(|t| t.room_id))
        .collect();
    let room_numbers: HashMap<i64, String> = Room::find()
        .filter(room::Column::Id.is_in(room_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.id, r.room_number))
        .collect();

    Ok(rows
        .into_iter()
        .filter_map(|(payment, tenant)| {
            tenant.map(|t| PaymentWithTenant {
                payment,
                tenant_name: t.full_name,
                room_number: t.room_id.and_then(|id| room_numbers.get(&id).cloned()),
            })
        })
        .collect())
}

/// Lists the calling tenant's own payments, most recent billing month first.
#[instrument(skip(db, identity))]
pub async fn list_payments_for_tenant(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<payment::Model>> {
    let tenant = auth::require_tenant(db, identity).await?;

    Payment::find()
        .filter(payment::Column::TenantId.eq(tenant.id))
        .order_by_desc(payment::Column::BillingMonth)
        .all(db)
        .await
        .map_err(Into::into)
}
