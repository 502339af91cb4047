//! Room entity - A rentable unit with type, price, and occupancy status.
//!
//! `(owner_id, room_number)` is unique per owner. The `status` field is
//! maintained, not freely settable: OCCUPIED and the occupied->EMPTY reset
//! come exclusively from the tenancy onboarding/offboarding transactions,
//! while MAINTENANCE and VACATING_SOON are owner-controlled toggles on
//! rooms without an active tenant.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category of a room, which usually determines its price band.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    /// Air-conditioned room
    #[sea_orm(string_value = "AC")]
    Ac,
    /// Fan-only room
    #[sea_orm(string_value = "NON_AC")]
    NonAc,
    /// Larger room with extra amenities
    #[sea_orm(string_value = "PREMIUM")]
    Premium,
}

/// Occupancy status of a room.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    /// No active tenant; available for onboarding
    #[sea_orm(string_value = "EMPTY")]
    Empty,
    /// Exactly one active tenant; set only by the onboarding transaction
    #[sea_orm(string_value = "OCCUPIED")]
    Occupied,
    /// Owner-flagged: reserved or about to be vacated, not bookable
    #[sea_orm(string_value = "VACATING_SOON")]
    VacatingSoon,
    /// Owner-flagged: under repair, not bookable
    #[sea_orm(string_value = "MAINTENANCE")]
    Maintenance,
}

/// Amenity list stored as a JSON array of strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Amenities(pub Vec<String>);

/// Room database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    /// Unique identifier for the room
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner this room belongs to
    pub owner_id: i64,
    /// Room number, unique within one owner's property (e.g. "101")
    pub room_number: String,
    /// Category of the room
    pub room_type: RoomType,
    /// Monthly rent in whole rupiah
    pub monthly_rent: i64,
    /// Amenities offered with the room (e.g. "AC", "WiFi"); never empty
    #[sea_orm(column_type = "Json")]
    pub amenities: Amenities,
    /// Current occupancy status
    pub status: RoomStatus,
}

/// Defines relationships between Room and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each room belongs to one owner
    #[sea_orm(
        belongs_to = "super::owner::Entity",
        from = "Column::OwnerId",
        to = "super::owner::Column::Id"
    )]
    Owner,
    /// Tenants that reference this room (at most one of them active)
    #[sea_orm(has_many = "super::tenant::Entity")]
    Tenants,
}

impl Related<super::owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
