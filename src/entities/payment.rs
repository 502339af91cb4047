//! Payment entity - A monthly rent submission pending owner verification.
//!
//! One row per submission; rows are never deleted. `verified_at` is set iff
//! the status is VERIFIED - rejecting a previously verified payment clears it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Verification state of a rent payment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Submitted, awaiting the owner's decision
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Accepted by the owner; counts toward revenue
    #[sea_orm(string_value = "VERIFIED")]
    Verified,
    /// Declined by the owner; the month may be resubmitted
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

/// Payment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Tenant who submitted the payment
    pub tenant_id: i64,
    /// Month being paid for, normalized to the first of the month
    pub billing_month: Date,
    /// Amount transferred, in whole rupiah
    pub amount: i64,
    /// Blob-store URL of the proof-of-transfer image
    pub proof_url: String,
    /// Verification state
    pub status: PaymentStatus,
    /// When the proof was uploaded
    pub uploaded_at: DateTimeUtc,
    /// When the payment was verified; None unless status is VERIFIED
    pub verified_at: Option<DateTimeUtc>,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one tenant
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
