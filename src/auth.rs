//! Identity gate - authentication and role scoping.
//!
//! Every operation in [`crate::core`] takes an [`Identity`] resolved here and
//! re-derives its owner or tenant scope from it. Client-supplied ids are
//! addressing only; they are always checked against the derived scope.
//!
//! Login identities are provisioned with a random one-time access token,
//! never a fixed default credential. Offboarding deactivates the identity
//! (it stays on record for audit but can no longer authenticate).

use crate::entities::{Owner, Tenant, User, UserRole, owner, tenant, user};
use crate::errors::{Error, Result};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::{info, instrument};
use uuid::Uuid;

/// The authenticated caller: who they are and which role they act in.
///
/// Produced only by [`authenticate`]; the core trusts it completely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Id of the authenticated [`user::Model`].
    pub user_id: i64,
    /// Role the identity authenticates as.
    pub role: UserRole,
}

/// Generates a fresh opaque access token.
#[must_use]
pub fn generate_access_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Resolves request credentials into an [`Identity`].
///
/// Unknown tokens and deactivated identities both come back as
/// [`Error::Unauthenticated`]; no domain logic runs before this check.
#[instrument(skip(db, bearer_token))]
pub async fn authenticate<C: ConnectionTrait>(db: &C, bearer_token: &str) -> Result<Identity> {
    let user = User::find()
        .filter(user::Column::AccessToken.eq(bearer_token))
        .filter(user::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or(Error::Unauthenticated)?;

    Ok(Identity {
        user_id: user.id,
        role: user.role,
    })
}

/// Derives the owner scope for a caller, rejecting non-owner roles.
pub async fn require_owner<C: ConnectionTrait>(
    db: &C,
    identity: &Identity,
) -> Result<owner::Model> {
    if identity.role != UserRole::Owner {
        return Err(Error::Unauthorized {
            reason: "owner role required".to_string(),
        });
    }

    Owner::find()
        .filter(owner::Column::UserId.eq(identity.user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "owner profile",
            id: identity.user_id.to_string(),
        })
}

/// Derives the active-tenant scope for a caller, rejecting non-tenant roles.
pub async fn require_tenant<C: ConnectionTrait>(
    db: &C,
    identity: &Identity,
) -> Result<tenant::Model> {
    if identity.role != UserRole::Tenant {
        return Err(Error::Unauthorized {
            reason: "tenant role required".to_string(),
        });
    }

    Tenant::find()
        .filter(tenant::Column::UserId.eq(identity.user_id))
        .filter(tenant::Column::ArchivedAt.is_null())
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "tenant profile",
            id: identity.user_id.to_string(),
        })
}

fn validate_email(email: &str) -> Result<()> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(())
    } else {
        Err(Error::Validation {
            field: "email",
            message: format!("'{email}' is not a valid email address"),
        })
    }
}

/// Provisions a new login identity with a freshly generated access token.
///
/// The token is available exactly once on the returned model, for
/// out-of-band delivery to the person being invited. Runs on the caller's
/// connection so it can participate in a surrounding transaction.
pub async fn provision_login<C: ConnectionTrait>(
    db: &C,
    email: &str,
    role: UserRole,
) -> Result<user::Model> {
    validate_email(email)?;

    let existing = User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::Conflict {
            message: format!("email '{email}' is already registered"),
        });
    }

    let new_user = user::ActiveModel {
        email: Set(email.to_string()),
        role: Set(role),
        access_token: Set(generate_access_token()),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = new_user.insert(db).await?;
    info!(user_id = created.id, "provisioned login identity");
    Ok(created)
}

/// Deactivates a login identity, keeping the row for audit.
pub async fn deactivate_login<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<()> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user",
            id: user_id.to_string(),
        })?;

    let mut active_model: user::ActiveModel = user.into();
    active_model.is_active = Set(false);
    active_model.update(db).await?;
    Ok(())
}
