//! User entity - Represents a login identity behind the identity gate.
//!
//! Every owner and every tenant holds exactly one user row. Tenants get
//! theirs provisioned during onboarding with a random one-time access token;
//! offboarding deactivates the row but keeps it for audit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role attached to a login identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Property manager; root of all data scoping.
    #[sea_orm(string_value = "OWNER")]
    Owner,
    /// Boarding-house resident.
    #[sea_orm(string_value = "TENANT")]
    Tenant,
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login email, unique across the system
    #[sea_orm(unique)]
    pub email: String,
    /// Role this identity authenticates as
    pub role: UserRole,
    /// Opaque bearer credential; generated at provisioning, never a fixed default
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Deactivated identities keep their row but can no longer authenticate
    pub is_active: bool,
    /// When the identity was provisioned
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An owner profile, if this identity has the OWNER role
    #[sea_orm(has_one = "super::owner::Entity")]
    Owner,
    /// A tenant record, if this identity has the TENANT role
    #[sea_orm(has_one = "super::tenant::Entity")]
    Tenant,
}

impl Related<super::owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
