//! Room registry business logic.
//!
//! Rooms carry a maintained occupancy status: OCCUPIED and the reset back to
//! EMPTY belong exclusively to the tenancy transactions in
//! [`crate::core::tenancy`]; this module only allows the owner-controlled
//! toggles between the non-occupied statuses. Deleting a room is guarded
//! against active occupants so a tenant can never be orphaned mid-lease.

use crate::auth::{self, Identity};
use crate::entities::{Amenities, Room, RoomStatus, RoomType, Tenant, room, tenant};
use crate::errors::{Error, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Fields required to create a new room.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRoom {
    /// Room number, unique within the owner's property
    pub room_number: String,
    /// Category of the room
    pub room_type: RoomType,
    /// Monthly rent in whole rupiah
    pub monthly_rent: i64,
    /// Amenities offered with the room; must not be empty
    pub amenities: Vec<String>,
}

/// Partial update of a room; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomPatch {
    /// New room number
    pub room_number: Option<String>,
    /// New room category
    pub room_type: Option<RoomType>,
    /// New monthly rent
    pub monthly_rent: Option<i64>,
    /// Replacement amenity list
    pub amenities: Option<Vec<String>>,
    /// Manual status toggle between the non-occupied statuses
    pub status: Option<RoomStatus>,
}

/// A room annotated with its occupying tenant's display name, if any.
#[derive(Debug, Clone, Serialize)]
pub struct RoomWithOccupant {
    /// The room itself
    pub room: room::Model,
    /// Full name of the active tenant occupying it, if occupied
    pub occupant_name: Option<String>,
}

fn validate_amenities(amenities: &[String]) -> Result<Amenities> {
    let cleaned: Vec<String> = amenities
        .iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Err(Error::Validation {
            field: "amenities",
            message: "at least one amenity is required".to_string(),
        });
    }
    Ok(Amenities(cleaned))
}

fn validate_rent(monthly_rent: i64, min_monthly_rent: i64) -> Result<()> {
    if monthly_rent < min_monthly_rent {
        return Err(Error::Validation {
            field: "monthly_rent",
            message: format!("monthly rent must be at least {min_monthly_rent}"),
        });
    }
    Ok(())
}

async fn ensure_room_number_free<C: ConnectionTrait>(
    db: &C,
    owner_id: i64,
    room_number: &str,
) -> Result<()> {
    let taken = Room::find()
        .filter(room::Column::OwnerId.eq(owner_id))
        .filter(room::Column::RoomNumber.eq(room_number))
        .one(db)
        .await?
        .is_some();
    if taken {
        return Err(Error::Conflict {
            message: format!("room number '{room_number}' already exists"),
        });
    }
    Ok(())
}

/// Loads a room and checks it belongs to the given owner.
///
/// Rooms of other owners are reported as absent, not forbidden.
pub(crate) async fn find_owned_room<C: ConnectionTrait>(
    db: &C,
    owner_id: i64,
    room_id: i64,
) -> Result<room::Model> {
    Room::find_by_id(room_id)
        .one(db)
        .await?
        .filter(|r| r.owner_id == owner_id)
        .ok_or_else(|| Error::NotFound {
            entity: "room",
            id: room_id.to_string(),
        })
}

/// Lists the owner's rooms, ordered by room number, each annotated with the
/// occupying tenant's name when there is one.
#[instrument(skip(db, identity))]
pub async fn list_rooms(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<RoomWithOccupant>> {
    let owner = auth::require_owner(db, identity).await?;

    let rooms = Room::find()
        .filter(room::Column::OwnerId.eq(owner.id))
        .order_by_asc(room::Column::RoomNumber)
        .all(db)
        .await?;

    let occupants: HashMap<i64, String> = Tenant::find()
        .filter(tenant::Column::OwnerId.eq(owner.id))
        .filter(tenant::Column::ArchivedAt.is_null())
        .all(db)
        .await?
        .into_iter()
        .filter_map(|t| t.room_id.map(|room_id| (room_id, t.full_name)))
        .collect();

    Ok(rooms
        .into_iter()
        .map(|room| {
            let occupant_name = occupants.get(&room.id).cloned();
            RoomWithOccupant {
                room,
                occupant_name,
            }
        })
        .collect())
}

/// Creates a new room for the caller, always starting EMPTY.
#[instrument(skip(db, identity, new_room))]
pub async fn create_room(
    db: &DatabaseConnection,
    identity: &Identity,
    min_monthly_rent: i64,
    new_room: NewRoom,
) -> Result<room::Model> {
    let owner = auth::require_owner(db, identity).await?;

    let room_number = new_room.room_number.trim().to_string();
    if room_number.is_empty() {
        return Err(Error::Validation {
            field: "room_number",
            message: "room number cannot be empty".to_string(),
        });
    }
    validate_rent(new_room.monthly_rent, min_monthly_rent)?;
    let amenities = validate_amenities(&new_room.amenities)?;
    ensure_room_number_free(db, owner.id, &room_number).await?;

    let room = room::ActiveModel {
        owner_id: Set(owner.id),
        room_number: Set(room_number),
        room_type: Set(new_room.room_type),
        monthly_rent: Set(new_room.monthly_rent),
        amenities: Set(amenities),
        status: Set(RoomStatus::Empty),
        ..Default::default()
    };

    let created = room.insert(db).await?;
    info!(room_id = created.id, room_number = %created.room_number, "created room");
    Ok(created)
}

/// Applies a partial update to a room.
///
/// Status changes are restricted: OCCUPIED can never be requested here, and
/// an occupied room's status belongs to the tenancy transactions alone.
#[instrument(skip(db, identity, patch))]
pub async fn update_room(
    db: &DatabaseConnection,
    identity: &Identity,
    min_monthly_rent: i64,
    room_id: i64,
    patch: RoomPatch,
) -> Result<room::Model> {
    let owner = auth::require_owner(db, identity).await?;
    let room = find_owned_room(db, owner.id, room_id).await?;

    if let Some(requested) = patch.status {
        if requested == RoomStatus::Occupied {
            return Err(Error::Validation {
                field: "status",
                message: "OCCUPIED is maintained by tenant onboarding and cannot be set directly"
                    .to_string(),
            });
        }
        if room.status == RoomStatus::Occupied {
            return Err(Error::Conflict {
                message: "an occupied room's status can only change by offboarding its tenant"
                    .to_string(),
            });
        }
    }

    let mut active_model: room::ActiveModel = room.clone().into();

    if let Some(room_number) = patch.room_number {
        let room_number = room_number.trim().to_string();
        if room_number.is_empty() {
            return Err(Error::Validation {
                field: "room_number",
                message: "room number cannot be empty".to_string(),
            });
        }
        if room_number != room.room_number {
            ensure_room_number_free(db, owner.id, &room_number).await?;
            active_model.room_number = Set(room_number);
        }
    }
    if let Some(room_type) = patch.room_type {
        active_model.room_type = Set(room_type);
    }
    if let Some(monthly_rent) = patch.monthly_rent {
        validate_rent(monthly_rent, min_monthly_rent)?;
        active_model.monthly_rent = Set(monthly_rent);
    }
    if let Some(amenities) = patch.amenities {
        active_model.amenities = Set(validate_amenities(&amenities)?);
    }
    if let Some(status) = patch.status {
        active_model.status = Set(status);
    }

    let updated = active_model.update(db).await?;
    Ok(updated)
}

/// Hard-deletes a room.
///
/// Fails with a conflict while an active tenant occupies it; archived
/// tenants that still reference the room are unlinked in the same
/// transaction so history never points at a missing row.
#[instrument(skip(db, identity))]
pub async fn delete_room(db: &DatabaseConnection, identity: &Identity, room_id: i64) -> Result<()> {
    let owner = auth::require_owner(db, identity).await?;

    let txn = db.begin().await?;

    let room = find_owned_room(&txn, owner.id, room_id).await?;

    let active_occupants = Tenant::find()
        .filter(tenant::Column::RoomId.eq(room_id))
        .filter(tenant::Column::ArchivedAt.is_null())
        .count(&txn)
        .await?;
    if active_occupants > 0 {
        return Err(Error::Conflict {
            message: format!(
                "room '{}' is occupied by an active tenant and cannot be deleted",
                room.room_number
            ),
        });
    }

    // Only archived tenants can still reference the room at this point
    Tenant::update_many()
        .col_expr(tenant::Column::RoomId, sea_orm::sea_query::Expr::value(None::<i64>))
        .filter(tenant::Column::RoomId.eq(room_id))
        .exec(&txn)
        .await?;

    room.delete(&txn).await?;
    txn.commit().await?;

    info!(room_id, "deleted room");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::TenantColumn;
    use crate::test_utils::{
        MIN_RENT, create_test_owner, create_test_room, onboard_test_tenant, setup_test_db,
    };

    fn sample_room(number: &str) -> NewRoom {
        NewRoom {
            room_number: number.to_string(),
            room_type: RoomType::Ac,
            monthly_rent: 1_500_000,
            amenities: vec!["AC".to_string(), "WiFi".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_room_starts_empty() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, identity) = create_test_owner(&db, "owner@example.com").await?;

        let room = create_room(&db, &identity, MIN_RENT, sample_room("101")).await?;

        assert_eq!(room.room_number, "101");
        assert_eq!(room.status, RoomStatus::Empty);
        assert_eq!(room.monthly_rent, 1_500_000);
        assert_eq!(room.amenities.0, vec!["AC", "WiFi"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_room_duplicate_number() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, identity) = create_test_owner(&db, "owner@example.com").await?;

        create_room(&db, &identity, MIN_RENT, sample_room("101")).await?;
        let result = create_room(&db, &identity, MIN_RENT, sample_room("101")).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_same_room_number_allowed_across_owners() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, first) = create_test_owner(&db, "first@example.com").await?;
        let (_, second) = create_test_owner(&db, "second@example.com").await?;

        create_room(&db, &first, MIN_RENT, sample_room("101")).await?;
        // Uniqueness is per owner, so a second property can reuse the number
        create_room(&db, &second, MIN_RENT, sample_room("101")).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_room_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, identity) = create_test_owner(&db, "owner@example.com").await?;

        let below_minimum = NewRoom {
            monthly_rent: MIN_RENT - 1,
            ..sample_room("101")
        };
        let result = create_room(&db, &identity, MIN_RENT, below_minimum).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "monthly_rent",
                ..
            }
        ));

        let no_amenities = NewRoom {
            amenities: vec![],
            ..sample_room("101")
        };
        let result = create_room(&db, &identity, MIN_RENT, no_amenities).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "amenities",
                ..
            }
        ));

        let blank_number = NewRoom {
            room_number: "   ".to_string(),
            ..sample_room("101")
        };
        let result = create_room(&db, &identity, MIN_RENT, blank_number).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "room_number",
                ..
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_rooms_ordered_by_number() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, identity) = create_test_owner(&db, "owner@example.com").await?;

        create_room(&db, &identity, MIN_RENT, sample_room("103")).await?;
        create_room(&db, &identity, MIN_RENT, sample_room("101")).await?;
        create_room(&db, &identity, MIN_RENT, sample_room("102")).await?;

        let rooms = list_rooms(&db, &identity).await?;
        let numbers: Vec<&str> = rooms.iter().map(|r| r.room.room_number.as_str()).collect();
        assert_eq!(numbers, vec!["101", "102", "103"]);
        assert!(rooms.iter().all(|r| r.occupant_name.is_none()));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_rooms_annotates_occupant() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, identity) = create_test_owner(&db, "owner@example.com").await?;
        let room = create_test_room(&db, &identity, "101").await?;
        onboard_test_tenant(&db, &identity, room.id, "budi@example.com").await?;

        let rooms = list_rooms(&db, &identity).await?;
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].room.status, RoomStatus::Occupied);
        assert_eq!(rooms[0].occupant_name.as_deref(), Some("Budi Santoso"));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_room_maintenance_toggle() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, identity) = create_test_owner(&db, "owner@example.com").await?;
        let room = create_test_room(&db, &identity, "101").await?;

        let updated = update_room(
            &db,
            &identity,
            MIN_RENT,
            room.id,
            RoomPatch {
                status: Some(RoomStatus::Maintenance),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.status, RoomStatus::Maintenance);

        let updated = update_room(
            &db,
            &identity,
            MIN_RENT,
            room.id,
            RoomPatch {
                status: Some(RoomStatus::Empty),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.status, RoomStatus::Empty);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_room_cannot_set_occupied() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, identity) = create_test_owner(&db, "owner@example.com").await?;
        let room = create_test_room(&db, &identity, "101").await?;

        let result = update_room(
            &db,
            &identity,
            MIN_RENT,
            room.id,
            RoomPatch {
                status: Some(RoomStatus::Occupied),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "status", .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_room_occupied_status_is_locked() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, identity) = create_test_owner(&db, "owner@example.com").await?;
        let room = create_test_room(&db, &identity, "101").await?;
        onboard_test_tenant(&db, &identity, room.id, "budi@example.com").await?;

        let result = update_room(
            &db,
            &identity,
            MIN_RENT,
            room.id,
            RoomPatch {
                status: Some(RoomStatus::Maintenance),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));

        // Non-status fields stay editable while occupied
        let updated = update_room(
            &db,
            &identity,
            MIN_RENT,
            room.id,
            RoomPatch {
                monthly_rent: Some(2_000_000),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.monthly_rent, 2_000_000);
        assert_eq!(updated.status, RoomStatus::Occupied);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_room_out_of_scope() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, first) = create_test_owner(&db, "first@example.com").await?;
        let (_, second) = create_test_owner(&db, "second@example.com").await?;
        let room = create_test_room(&db, &first, "101").await?;

        let result = update_room(
            &db,
            &second,
            MIN_RENT,
            room.id,
            RoomPatch {
                monthly_rent: Some(2_000_000),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "room", .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_empty_room() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, identity) = create_test_owner(&db, "owner@example.com").await?;
        let room = create_test_room(&db, &identity, "101").await?;

        delete_room(&db, &identity, room.id).await?;

        let remaining = Room::find_by_id(room.id).one(&db).await?;
        assert!(remaining.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_occupied_room_conflicts() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, identity) = create_test_owner(&db, "owner@example.com").await?;
        let room = create_test_room(&db, &identity, "101").await?;
        onboard_test_tenant(&db, &identity, room.id, "budi@example.com").await?;

        let result = delete_room(&db, &identity, room.id).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));

        // Room survives the refused delete
        assert!(Room::find_by_id(room.id).one(&db).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_room_unlinks_archived_tenants() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, identity) = create_test_owner(&db, "owner@example.com").await?;
        let room = create_test_room(&db, &identity, "101").await?;
        let (tenant, _) = onboard_test_tenant(&db, &identity, room.id, "budi@example.com").await?;

        crate::core::tenancy::offboard_tenant(&db, &identity, tenant.id).await?;
        delete_room(&db, &identity, room.id).await?;

        let archived = Tenant::find_by_id(tenant.id).one(&db).await?.unwrap();
        assert!(archived.room_id.is_none());
        assert!(archived.archived_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_list_rooms_scoped_per_owner() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, first) = create_test_owner(&db, "first@example.com").await?;
        let (_, second) = create_test_owner(&db, "second@example.com").await?;
        create_test_room(&db, &first, "101").await?;
        create_test_room(&db, &second, "201").await?;

        let first_rooms = list_rooms(&db, &first).await?;
        assert_eq!(first_rooms.len(), 1);
        assert_eq!(first_rooms[0].room.room_number, "101");

        let second_rooms = list_rooms(&db, &second).await?;
        assert_eq!(second_rooms.len(), 1);
        assert_eq!(second_rooms[0].room.room_number, "201");

        Ok(())
    }

    #[tokio::test]
    async fn test_occupant_annotation_drops_after_offboard() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, identity) = create_test_owner(&db, "owner@example.com").await?;
        let room = create_test_room(&db, &identity, "101").await?;
        let (tenant, _) = onboard_test_tenant(&db, &identity, room.id, "budi@example.com").await?;

        crate::core::tenancy::offboard_tenant(&db, &identity, tenant.id).await?;

        let rooms = list_rooms(&db, &identity).await?;
        assert_eq!(rooms[0].room.status, RoomStatus::Empty);
        assert!(rooms[0].occupant_name.is_none());

        // The archived tenant still references the room for history
        let archived = Tenant::find()
            .filter(TenantColumn::Id.eq(tenant.id))
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(archived.room_id, Some(room.id));

        Ok(())
    }
}
