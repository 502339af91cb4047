//! Tenancy manager - the onboarding and offboarding transactions.
//!
//! These are the only operations that span multiple entities atomically:
//! login identity, tenant row, and room status commit together or not at
//! all. Concurrent onboarding attempts against the same room are decided by
//! a conditional `EMPTY -> OCCUPIED` update; whoever finds zero affected
//! rows lost the race and gets a conflict, never a corrupted state.

use crate::auth::{self, Identity};
use crate::entities::{
    LeaseStatus, Room, RoomStatus, Tenant, User, UserRole, room, tenant, user,
};
use crate::errors::{Error, Result};
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Everything needed to onboard a tenant into a room.
#[derive(Debug, Clone, Deserialize)]
pub struct OnboardTenant {
    /// Full legal name (at least 3 characters)
    pub full_name: String,
    /// National identity number (exactly 16 digits)
    pub id_number: String,
    /// Contact phone number (08..., 11-13 digits)
    pub phone: String,
    /// Home address outside the boarding house (at least 5 characters)
    pub home_address: String,
    /// Room to occupy; must be EMPTY and belong to the caller
    pub room_id: i64,
    /// Date the lease starts
    pub check_in_date: NaiveDate,
    /// Blob-store URL of the identity-card photo, if already uploaded
    pub id_photo_url: Option<String>,
    /// Login email for the tenant's new identity
    pub login_email: String,
}

/// Result of a successful onboarding.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingResult {
    /// The created tenant
    pub tenant: tenant::Model,
    /// One-time access token for the tenant's new login; shown exactly once
    /// for out-of-band delivery, never derivable again
    pub invite_token: String,
}

/// A tenant annotated with login email and room number for listings.
#[derive(Debug, Clone, Serialize)]
pub struct TenantSummary {
    /// The tenant itself
    pub tenant: tenant::Model,
    /// Login email of the tenant's identity
    pub email: String,
    /// Number of the room the tenant occupies, if the room still exists
    pub room_number: Option<String>,
}

fn validate_onboarding(input: &OnboardTenant) -> Result<()> {
    if input.full_name.trim().len() < 3 {
        return Err(Error::Validation {
            field: "full_name",
            message: "full name must be at least 3 characters".to_string(),
        });
    }
    if input.id_number.len() != 16 || !input.id_number.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::Validation {
            field: "id_number",
            message: "identity number must be exactly 16 digits".to_string(),
        });
    }
    let phone_ok = input.phone.starts_with("08")
        && input.phone.chars().all(|c| c.is_ascii_digit())
        && (11..=13).contains(&input.phone.len());
    if !phone_ok {
        return Err(Error::Validation {
            field: "phone",
            message: "phone number must start with 08 and be 11-13 digits".to_string(),
        });
    }
    if input.home_address.trim().len() < 5 {
        return Err(Error::Validation {
            field: "home_address",
            message: "home address must be at least 5 characters".to_string(),
        });
    }
    Ok(())
}

/// Lists the owner's active tenants, newest first, annotated with login
/// email and room number.
#[instrument(skip(db, identity))]
pub async fn list_active_tenants(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<TenantSummary>> {
    let owner = auth::require_owner(db, identity).await?;

    let tenants = Tenant::find()
        .filter(tenant::Column::OwnerId.eq(owner.id))
        .filter(tenant::Column::ArchivedAt.is_null())
        .order_by_desc(tenant::Column::CreatedAt)
        .all(db)
        .await?;

    let user_ids: Vec<i64> = tenants.iter().map(|t| t.user_id).collect();
    let emails: HashMap<i64, String> = User::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.email))
        .collect();

    let room_ids: Vec<i64> = tenants.iter().filter_map(|t| t.room_id).collect();
    let room_numbers: HashMap<i64, String> = Room::find()
        .filter(room::Column::Id.is_in(room_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.id, r.room_number))
        .collect();

    Ok(tenants
        .into_iter()
        .map(|tenant| {
            let email = emails.get(&tenant.user_id).cloned().unwrap_or_default();
            let room_number = tenant
                .room_id
                .and_then(|id| room_numbers.get(&id).cloned());
            TenantSummary {
                tenant,
                email,
                room_number,
            }
        })
        .collect())
}

/// Onboards a tenant: provisions a login identity, creates the tenant row,
/// and flips the room `EMPTY -> OCCUPIED`, all in one transaction.
///
/// The invitation token in the result is the only time the tenant's
/// credential is ever exposed.
#[instrument(skip(db, identity, input), fields(room_id = input.room_id))]
pub async fn onboard_tenant(
    db: &DatabaseConnection,
    identity: &Identity,
    input: OnboardTenant,
) -> Result<OnboardingResult> {
    let owner = auth::require_owner(db, identity).await?;
    validate_onboarding(&input)?;

    let txn = db.begin().await?;

    // 1. The login email must be free
    let email_taken = User::find()
        .filter(user::Column::Email.eq(input.login_email.as_str()))
        .one(&txn)
        .await?
        .is_some();
    if email_taken {
        return Err(Error::Conflict {
            message: format!("email '{}' is already registered", input.login_email),
        });
    }

    // 2. The target room must be the caller's and EMPTY
    let target = crate::core::room::find_owned_room(&txn, owner.id, input.room_id).await?;
    if target.status != RoomStatus::Empty {
        return Err(Error::Conflict {
            message: format!("room '{}' is not available", target.room_number),
        });
    }

    // Conditional update; a concurrent onboarding of the same room makes one
    // of the two see zero affected rows here and roll back
    let claimed = Room::update_many()
        .col_expr(room::Column::Status, Expr::value(RoomStatus::Occupied))
        .filter(room::Column::Id.eq(target.id))
        .filter(room::Column::Status.eq(RoomStatus::Empty))
        .exec(&txn)
        .await?;
    if claimed.rows_affected != 1 {
        return Err(Error::Conflict {
            message: format!("room '{}' is not available", target.room_number),
        });
    }

    // 3. Provision the tenant's login with a one-time invitation token
    let login = auth::provision_login(&txn, &input.login_email, UserRole::Tenant).await?;

    // 4. Create the tenant row
    let tenant = tenant::ActiveModel {
        owner_id: Set(owner.id),
        user_id: Set(login.id),
        room_id: Set(Some(target.id)),
        full_name: Set(input.full_name.trim().to_string()),
        id_number: Set(input.id_number),
        phone: Set(input.phone),
        home_address: Set(input.home_address.trim().to_string()),
        id_photo_url: Set(input.id_photo_url),
        check_in_date: Set(input.check_in_date),
        check_out_date: Set(None),
        lease_status: Set(LeaseStatus::Active),
        archived_at: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let tenant = tenant.insert(&txn).await?;

    txn.commit().await?;

    info!(
        tenant_id = tenant.id,
        room_id = target.id,
        "onboarded tenant"
    );
    Ok(OnboardingResult {
        tenant,
        invite_token: login.access_token,
    })
}

/// Offboards a tenant: archives the row, frees the room, and deactivates the
/// login, all in one transaction.
///
/// A second offboarding of the same tenant fails with not-found and leaves
/// the room untouched.
#[instrument(skip(db, identity))]
pub async fn offboard_tenant(
    db: &DatabaseConnection,
    identity: &Identity,
    tenant_id: i64,
) -> Result<tenant::Model> {
    let owner = auth::require_owner(db, identity).await?;

    let txn = db.begin().await?;

    let tenant = Tenant::find_by_id(tenant_id)
        .one(&txn)
        .await?
        .filter(|t| t.owner_id == owner.id && t.archived_at.is_none())
        .ok_or_else(|| Error::NotFound {
            entity: "tenant",
            id: tenant_id.to_string(),
        })?;

    let now = Utc::now();
    let vacated_room = tenant.room_id;
    let user_id = tenant.user_id;

    let mut active_model: tenant::ActiveModel = tenant.into();
    active_model.archived_at = Set(Some(now));
    active_model.check_out_date = Set(Some(now.date_naive()));
    active_model.lease_status = Set(LeaseStatus::Inactive);
    let archived = active_model.update(&txn).await?;

    if let Some(room_id) = vacated_room {
        Room::update_many()
            .col_expr(room::Column::Status, Expr::value(RoomStatus::Empty))
            .filter(room::Column::Id.eq(room_id))
            .exec(&txn)
            .await?;
    }

    auth::deactivate_login(&txn, user_id).await?;

    txn.commit().await?;

    info!(tenant_id, "offboarded tenant");
    Ok(archived)
}
