//! Shared test utilities for `Koshub`.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test entities with sensible defaults.

use crate::auth::{self, Identity};
use crate::blob::BlobStore;
use crate::core::{complaint, owner, rent, room, tenancy};
use crate::entities;
use crate::errors::Result;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Minimum monthly rent used across the test suites.
pub const MIN_RENT: i64 = 100_000;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Registers a test owner and returns the profile with its identity.
///
/// # Defaults
/// * `name`: "Kos Sejahtera"
/// * `address`: "Jl. Mawar No. 10"
/// * `phone`: "081234567890"
pub async fn create_test_owner(
    db: &DatabaseConnection,
    email: &str,
) -> Result<(entities::owner::Model, Identity)> {
    let registered = owner::register_owner(
        db,
        owner::RegisterOwner {
            name: "Kos Sejahtera".to_string(),
            address: "Jl. Mawar No. 10".to_string(),
            phone: "081234567890".to_string(),
            login_email: email.to_string(),
        },
    )
    .await?;
    let identity = auth::authenticate(db, &registered.access_token).await?;
    Ok((registered.owner, identity))
}

/// Creates a test room with sensible defaults.
///
/// # Defaults
/// * `room_type`: AC
/// * `monthly_rent`: 1 500 000
/// * `amenities`: AC, WiFi
pub async fn create_test_room(
    db: &DatabaseConnection,
    owner_identity: &Identity,
    room_number: &str,
) -> Result<entities::room::Model> {
    room::create_room(
        db,
        owner_identity,
        MIN_RENT,
        room::NewRoom {
            room_number: room_number.to_string(),
            room_type: entities::RoomType::Ac,
            monthly_rent: 1_500_000,
            amenities: vec!["AC".to_string(), "WiFi".to_string()],
        },
    )
    .await
}

/// Builds a valid onboarding input for the given room and login email.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn onboard_input(room_id: i64, login_email: &str) -> tenancy::OnboardTenant {
    tenancy::OnboardTenant {
        full_name: "Budi Santoso".to_string(),
        id_number: "3201234567890001".to_string(),
        phone: "089876543210".to_string(),
        home_address: "Jl. Kampung Halaman No. 1".to_string(),
        room_id,
        check_in_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        id_photo_url: None,
        login_email: login_email.to_string(),
    }
}

/// Onboards a test tenant into the given room and returns the tenant with
/// an authenticated identity for it.
pub async fn onboard_test_tenant(
    db: &DatabaseConnection,
    owner_identity: &Identity,
    room_id: i64,
    login_email: &str,
) -> Result<(entities::tenant::Model, Identity)> {
    let result =
        tenancy::onboard_tenant(db, owner_identity, onboard_input(room_id, login_email)).await?;
    let identity = auth::authenticate(db, &result.invite_token).await?;
    Ok((result.tenant, identity))
}

/// Submits a test payment of 1 500 000 for the given billing month.
pub async fn submit_test_payment<B: BlobStore>(
    db: &DatabaseConnection,
    blob: &B,
    tenant_identity: &Identity,
    billing_month: NaiveDate,
) -> Result<entities::payment::Model> {
    rent::submit_payment(
        db,
        blob,
        tenant_identity,
        rent::SubmitPayment {
            billing_month,
            amount: 1_500_000,
            proof: b"transfer receipt".to_vec(),
            proof_content_type: "image/jpeg".to_string(),
        },
    )
    .await
}

/// Files a test complaint with the given title.
pub async fn file_test_complaint<B: BlobStore>(
    db: &DatabaseConnection,
    blob: &B,
    tenant_identity: &Identity,
    title: &str,
) -> Result<entities::complaint::Model> {
    complaint::file_complaint(
        db,
        blob,
        tenant_identity,
        complaint::FileComplaint {
            title: title.to_string(),
            description: "Something needs fixing".to_string(),
            photo: None,
            photo_content_type: None,
        },
    )
    .await
}
