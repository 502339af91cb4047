//! Notification entity - An owner-facing event record derived from tenant
//! actions. Mutated only to flip the read flag.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of event a notification records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// A tenant filed a new complaint
    #[sea_orm(string_value = "NEW_COMPLAINT")]
    NewComplaint,
    /// A tenant submitted a rent payment proof
    #[sea_orm(string_value = "PAYMENT_SUBMITTED")]
    PaymentSubmitted,
}

/// Notification database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    /// Unique identifier for the notification
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner the notification is addressed to
    pub owner_id: i64,
    /// Event kind
    pub kind: NotificationKind,
    /// Short headline
    pub title: String,
    /// Human-readable body
    pub body: String,
    /// Whether the owner has seen it
    pub is_read: bool,
    /// When the event happened
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Notification and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each notification belongs to one owner
    #[sea_orm(
        belongs_to = "super::owner::Entity",
        from = "Column::OwnerId",
        to = "super::owner::Column::Id"
    )]
    Owner,
}

impl Related<super::owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
