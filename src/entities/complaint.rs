//! Complaint entity - A tenant-filed maintenance/issue ticket.
//!
//! Status only moves forward: NEW -> IN_PROGRESS -> RESOLVED, one step at a
//! time, owner action only. Complaints are never deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Triage state of a complaint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    /// Filed, not yet picked up
    #[sea_orm(string_value = "NEW")]
    New,
    /// Owner is working on it
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    /// Fixed and closed
    #[sea_orm(string_value = "RESOLVED")]
    Resolved,
}

impl ComplaintStatus {
    /// The only status this one may advance to, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::New => Some(Self::InProgress),
            Self::InProgress => Some(Self::Resolved),
            Self::Resolved => None,
        }
    }

    /// Wire name of the status, as stored and as shown in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
        }
    }
}

/// Complaint database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaints")]
pub struct Model {
    /// Unique identifier for the complaint
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Tenant who filed the complaint
    pub tenant_id: i64,
    /// Short summary of the issue
    pub title: String,
    /// Full description of the issue
    pub description: String,
    /// Optional blob-store URL of a supporting photo
    pub photo_url: Option<String>,
    /// Triage state
    pub status: ComplaintStatus,
    /// When the complaint was filed
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Complaint and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each complaint belongs to one tenant
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
