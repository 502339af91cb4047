//! Owner entity - The property-manager account that scopes all other data.
//!
//! Every room, tenant, payment (via its tenant), complaint (via its tenant),
//! and notification belongs to exactly one owner.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Owner database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "owners")]
pub struct Model {
    /// Unique identifier for the owner
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login identity backing this owner (1:1)
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Display name of the boarding house / property manager
    pub name: String,
    /// Street address of the property
    pub address: String,
    /// Contact phone number
    pub phone: String,
    /// When the owner account was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Owner and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The backing login identity
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Rooms this owner rents out
    #[sea_orm(has_many = "super::room::Entity")]
    Rooms,
    /// Tenants (active and archived) under this owner
    #[sea_orm(has_many = "super::tenant::Entity")]
    Tenants,
    /// Notifications addressed to this owner
    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rooms.def()
    }
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
