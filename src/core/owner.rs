//! Owner account registration and profile lookup.
//!
//! Registration is the once-per-property-manager operation that provisions
//! an OWNER login and the owner profile together. Like tenant onboarding,
//! the credential is a random one-time token returned exactly once.

use crate::auth::{self, Identity};
use crate::entities::{UserRole, owner};
use crate::errors::{Error, Result};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Everything needed to register an owner account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterOwner {
    /// Display name of the boarding house
    pub name: String,
    /// Street address of the property
    pub address: String,
    /// Contact phone number (08..., 11-13 digits)
    pub phone: String,
    /// Login email for the owner's new identity
    pub login_email: String,
}

/// Result of a successful registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationResult {
    /// The created owner profile
    pub owner: owner::Model,
    /// One-time access token for the owner's login; shown exactly once
    pub access_token: String,
}

/// Registers a new owner: login identity plus profile, one transaction.
#[instrument(skip(db, input))]
pub async fn register_owner(
    db: &DatabaseConnection,
    input: RegisterOwner,
) -> Result<RegistrationResult> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            field: "name",
            message: "a property name is required".to_string(),
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

    let txn = db.begin().await?;

    let login = auth::provision_login(&txn, &input.login_email, UserRole::Owner).await?;

    let profile = owner::ActiveModel {
        user_id: Set(login.id),
        name: Set(name),
        address: Set(input.address.trim().to_string()),
        phone: Set(input.phone),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let profile = profile.insert(&txn).await?;

    txn.commit().await?;

    info!(owner_id = profile.id, "registered owner");
    Ok(RegistrationResult {
        owner: profile,
        access_token: login.access_token,
    })
}

/// Returns the calling owner's profile.
pub async fn get_owner_profile(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<owner::Model> {
    auth::require_owner(db, identity).await
}
