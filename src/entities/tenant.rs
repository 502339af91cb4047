//! Tenant entity - A boarding-house resident renting a room.
//!
//! Tenants are never physically deleted: offboarding archives the row
//! (`archived_at` set, lease INACTIVE) so payment and complaint history
//! stays referentially intact. The room link survives archival and is only
//! nulled if the room itself is later hard-deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lease lifecycle state of a tenant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaseStatus {
    /// Currently renting
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    /// Offboarded; kept for history only
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

/// Tenant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    /// Unique identifier for the tenant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner this tenant rents from
    pub owner_id: i64,
    /// Login identity provisioned at onboarding (1:1)
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Room currently or last rented; None only after the room was deleted
    pub room_id: Option<i64>,
    /// Full legal name
    pub full_name: String,
    /// National identity number (16 digits)
    pub id_number: String,
    /// Contact phone number
    pub phone: String,
    /// Home address outside the boarding house
    pub home_address: String,
    /// Blob-store URL of the uploaded identity-card photo
    pub id_photo_url: Option<String>,
    /// Date the lease started
    pub check_in_date: Date,
    /// Date the lease ended; set by offboarding
    pub check_out_date: Option<Date>,
    /// Lease lifecycle state
    pub lease_status: LeaseStatus,
    /// Archival instant; a tenant is active iff this is None
    pub archived_at: Option<DateTimeUtc>,
    /// When the tenant record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Tenant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each tenant belongs to one owner
    #[sea_orm(
        belongs_to = "super::owner::Entity",
        from = "Column::OwnerId",
        to = "super::owner::Column::Id"
    )]
    Owner,
    /// The room this tenant occupies (or last occupied)
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id"
    )]
    Room,
    /// The login identity backing this tenant
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Rent payments submitted by this tenant
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
    /// Complaints filed by this tenant
    #[sea_orm(has_many = "super::complaint::Entity")]
    Complaints,
}

impl Related<super::owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::complaint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Complaints.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
