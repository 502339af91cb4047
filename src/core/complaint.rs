//! Complaint tracker - filing and triage.
//!
//! Complaints move strictly forward, one step at a time:
//! NEW -> IN_PROGRESS -> RESOLVED. Filing a complaint raises the owner's
//! notification in the same transaction, so either both records exist or
//! neither does.

use crate::auth::{self, Identity};
use crate::blob::BlobStore;
use crate::core::notification::notify_owner;
use crate::entities::{
    Complaint, ComplaintStatus, NotificationKind, Room, Tenant, complaint, room, tenant,
};
use crate::errors::{Error, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument};

/// A tenant's new complaint.
#[derive(Debug, Clone)]
pub struct FileComplaint {
    /// Short summary of the issue
    pub title: String,
    /// Full description of the issue
    pub description: String,
    /// Optional supporting photo bytes
    pub photo: Option<Vec<u8>>,
    /// MIME type of the photo, when one is attached
    pub photo_content_type: Option<String>,
}

/// A complaint annotated with tenant name and room number for owner listings.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintWithTenant {
    /// The complaint itself
    pub complaint: complaint::Model,
    /// Full name of the filing tenant
    pub tenant_name: String,
    /// Room number of the filing tenant, if the room still exists
    pub room_number: Option<String>,
}

/// Files a complaint for the calling tenant and notifies the owner.
#[instrument(skip(db, blob, identity, input))]
pub async fn file_complaint<B: BlobStore>(
    db: &DatabaseConnection,
    blob: &B,
    identity: &Identity,
    input: FileComplaint,
) -> Result<complaint::Model> {
    let tenant = auth::require_tenant(db, identity).await?;

    let title = input.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::Validation {
            field: "title",
            message: "a complaint needs a title".to_string(),
        });
    }
    let description = input.description.trim().to_string();
    if description.is_empty() {
        return Err(Error::Validation {
            field: "description",
            message: "a complaint needs a description".to_string(),
        });
    }

    // Upload before the transaction; a failed upload files nothing
    let photo_url = match input.photo {
        Some(bytes) if !bytes.is_empty() => {
            let content_type = input
                .photo_content_type
                .as_deref()
                .unwrap_or("application/octet-stream");
            Some(blob.store(&bytes, content_type).await?)
        }
        _ => None,
    };

    let txn = db.begin().await?;

    let created = complaint::ActiveModel {
        tenant_id: Set(tenant.id),
        title: Set(title.clone()),
        description: Set(description),
        photo_url: Set(photo_url),
        status: Set(ComplaintStatus::New),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = created.insert(&txn).await?;

    notify_owner(
        &txn,
        tenant.owner_id,
        NotificationKind::NewComplaint,
        "New complaint",
        format!("{} reported: {title}", tenant.full_name),
    )
    .await?;

    txn.commit().await?;

    info!(complaint_id = created.id, "complaint filed");
    Ok(created)
}

/// Advances a complaint one step, rejecting skips and regressions.
#[instrument(skip(db, identity))]
pub async fn advance_complaint(
    db: &DatabaseConnection,
    identity: &Identity,
    complaint_id: i64,
    next: ComplaintStatus,
) -> Result<complaint::Model> {
    let owner = auth::require_owner(db, identity).await?;

    let found = Complaint::find_by_id(complaint_id)
        .find_also_related(Tenant)
        .one(db)
        .await?;
    let complaint = match found {
        Some((complaint, Some(tenant))) if tenant.owner_id == owner.id => complaint,
        _ => {
            return Err(Error::NotFound {
                entity: "complaint",
                id: complaint_id.to_string(),
            });
        }
    };

    if complaint.status.next() != Some(next) {
        return Err(Error::InvalidTransition {
            from: complaint.status.as_str().to_string(),
            to: next.as_str().to_string(),
        });
    }

    let mut active_model: complaint::ActiveModel = complaint.into();
    active_model.status = Set(next);
    let updated = active_model.update(db).await?;

    info!(complaint_id, status = next.as_str(), "complaint advanced");
    Ok(updated)
}

/// Lists every complaint across the owner's tenants, newest first,
/// annotated with tenant name and room number.
#[instrument(skip(db, identity))]
pub async fn list_complaints_for_owner(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<ComplaintWithTenant>> {
    let owner = auth::require_owner(db, identity).await?;

    let rows = Complaint::find()
        .find_also_related(Tenant)
        .filter(tenant::Column::OwnerId.eq(owner.id))
        .order_by_desc(complaint::Column::CreatedAt)
        .order_by_desc(complaint::Column::Id)
        .all(db)
        .await?;

    let room_ids: Vec<i64> = rows
        .iter()
        .filter_map(|(_, t)| t.as_ref().and_then(|t| t.room_id))
        .collect();
    let room_numbers: HashMap<i64, String> = Room::find()
        .filter(room::Column::Id.is_in(room_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.id, r.room_number))
        .collect();

    Ok(rows
        .into_iter()
        .filter_map(|(complaint, tenant)| {
            tenant.map(|t| ComplaintWithTenant {
                complaint,
                tenant_name: t.full_name,
                room_number: t.room_id.and_then(|id| room_numbers.get(&id).cloned()),
            })
        })
        .collect())
}

/// Lists the calling tenant's own complaints, newest first.
#[instrument(skip(db, identity))]
pub async fn list_complaints_for_tenant(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<complaint::Model>> {
    let tenant = auth::require_tenant(db, identity).await?;

    Complaint::find()
        .filter(complaint::Column::TenantId.eq(tenant.id))
        .order_by_desc(complaint::Column::CreatedAt)
        .order_by_desc(complaint::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::blob::{FailingBlobStore, MemoryBlobStore};
    use crate::core::notification::list_notifications;
    use crate::entities::Notification;
    use crate::test_utils::{
        create_test_owner, create_test_room, file_test_complaint, onboard_test_tenant,
        setup_test_db,
    };

    async fn setup_tenancy(db: &DatabaseConnection) -> Result<(Identity, Identity)> {
        let (_, owner_identity) = create_test_owner(db, "owner@example.com").await?;
        let target = create_test_room(db, &owner_identity, "101").await?;
        let (_, tenant_identity) =
            onboard_test_tenant(db, &owner_identity, target.id, "budi@example.com").await?;
        Ok((owner_identity, tenant_identity))
    }

    #[tokio::test]
    async fn test_file_complaint_notifies_owner() -> Result<()> {
        let db = setup_test_db().await?;
        let blob = MemoryBlobStore::default();
        let (owner_identity, tenant_identity) = setup_tenancy(&db).await?;

        let complaint = file_complaint(
            &db,
            &blob,
            &tenant_identity,
            FileComplaint {
                title: "Leaking roof".to_string(),
                description: "Water drips over the bed when it rains".to_string(),
                photo: None,
                photo_content_type: None,
            },
        )
        .await?;

        assert_eq!(complaint.status, ComplaintStatus::New);
        assert!(complaint.photo_url.is_none());

        let feed = list_notifications(&db, &owner_identity).await?;
        assert_eq!(feed.unread_count, 1);
        assert_eq!(feed.notifications[0].kind, NotificationKind::NewComplaint);
        assert_eq!(
            feed.notifications[0].body,
            "Budi Santoso reported: Leaking roof"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_file_complaint_with_photo() -> Result<()> {
        let db = setup_test_db().await?;
        let blob = MemoryBlobStore::default();
        let (_, tenant_identity) = setup_tenancy(&db).await?;

        let complaint = file_complaint(
            &db,
            &blob,
            &tenant_identity,
            FileComplaint {
                title: "Broken window".to_string(),
                description: "The latch came off".to_string(),
                photo: Some(b"jpeg-bytes".to_vec()),
                photo_content_type: Some("image/jpeg".to_string()),
            },
        )
        .await?;

        assert!(complaint.photo_url.is_some());
        assert_eq!(blob.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_file_complaint_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let blob = MemoryBlobStore::default();
        let (_, tenant_identity) = setup_tenancy(&db).await?;

        let result = file_complaint(
            &db,
            &blob,
            &tenant_identity,
            FileComplaint {
                title: "  ".to_string(),
                description: "something".to_string(),
                photo: None,
                photo_content_type: None,
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "title", .. }
        ));

        let result = file_complaint(
            &db,
            &blob,
            &tenant_identity,
            FileComplaint {
                title: "Broken tap".to_string(),
                description: String::new(),
                photo: None,
                photo_content_type: None,
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "description",
                ..
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_photo_upload_files_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, tenant_identity) = setup_tenancy(&db).await?;

        let result = file_complaint(
            &db,
            &FailingBlobStore,
            &tenant_identity,
            FileComplaint {
                title: "Broken window".to_string(),
                description: "The latch came off".to_string(),
                photo: Some(b"jpeg-bytes".to_vec()),
                photo_content_type: Some("image/jpeg".to_string()),
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Dependency { .. }));

        assert!(Complaint::find().one(&db).await?.is_none());
        assert!(Notification::find().one(&db).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_advance_walks_the_ladder() -> Result<()> {
        let db = setup_test_db().await?;
        let blob = MemoryBlobStore::default();
        let (owner_identity, tenant_identity) = setup_tenancy(&db).await?;
        let complaint = file_test_complaint(&db, &blob, &tenant_identity, "Leaking roof").await?;

        let in_progress = advance_complaint(
            &db,
            &owner_identity,
            complaint.id,
            ComplaintStatus::InProgress,
        )
        .await?;
        assert_eq!(in_progress.status, ComplaintStatus::InProgress);

        let resolved =
            advance_complaint(&db, &owner_identity, complaint.id, ComplaintStatus::Resolved)
                .await?;
        assert_eq!(resolved.status, ComplaintStatus::Resolved);

        Ok(())
    }

    #[tokio::test]
    async fn test_advance_rejects_skip() -> Result<()> {
        let db = setup_test_db().await?;
        let blob = MemoryBlobStore::default();
        let (owner_identity, tenant_identity) = setup_tenancy(&db).await?;
        let complaint = file_test_complaint(&db, &blob, &tenant_identity, "Leaking roof").await?;

        let result =
            advance_complaint(&db, &owner_identity, complaint.id, ComplaintStatus::Resolved)
                .await;
        match result.unwrap_err() {
            Error::InvalidTransition { from, to } => {
                assert_eq!(from, "NEW");
                assert_eq!(to, "RESOLVED");
            }
            other => panic!("expected InvalidTransition, got {other:?}"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_advance_rejects_regression() -> Result<()> {
        let db = setup_test_db().await?;
        let blob = MemoryBlobStore::default();
        let (owner_identity, tenant_identity) = setup_tenancy(&db).await?;
        let complaint = file_test_complaint(&db, &blob, &tenant_identity, "Leaking roof").await?;

        advance_complaint(
            &db,
            &owner_identity,
            complaint.id,
            ComplaintStatus::InProgress,
        )
        .await?;
        advance_complaint(&db, &owner_identity, complaint.id, ComplaintStatus::Resolved).await?;

        // Resolved is terminal in every direction
        for target in [
            ComplaintStatus::New,
            ComplaintStatus::InProgress,
            ComplaintStatus::Resolved,
        ] {
            let result = advance_complaint(&db, &owner_identity, complaint.id, target).await;
            assert!(matches!(
                result.unwrap_err(),
                Error::InvalidTransition { .. }
            ));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_advance_scoped_to_owner() -> Result<()> {
        let db = setup_test_db().await?;
        let blob = MemoryBlobStore::default();
        let (_, tenant_identity) = setup_tenancy(&db).await?;
        let (_, other_owner) = create_test_owner(&db, "other@example.com").await?;
        let complaint = file_test_complaint(&db, &blob, &tenant_identity, "Leaking roof").await?;

        let result =
            advance_complaint(&db, &other_owner, complaint.id, ComplaintStatus::InProgress).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "complaint",
                ..
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_listings() -> Result<()> {
        let db = setup_test_db().await?;
        let blob = MemoryBlobStore::default();
        let (owner_identity, tenant_identity) = setup_tenancy(&db).await?;

        file_test_complaint(&db, &blob, &tenant_identity, "First issue").await?;
        file_test_complaint(&db, &blob, &tenant_identity, "Second issue").await?;

        let owner_view = list_complaints_for_owner(&db, &owner_identity).await?;
        assert_eq!(owner_view.len(), 2);
        assert_eq!(owner_view[0].complaint.title, "Second issue");
        assert_eq!(owner_view[0].tenant_name, "Budi Santoso");
        assert_eq!(owner_view[0].room_number.as_deref(), Some("101"));

        let tenant_view = list_complaints_for_tenant(&db, &tenant_identity).await?;
        assert_eq!(tenant_view.len(), 2);
        assert_eq!(tenant_view[0].title, "Second issue");

        Ok(())
    }
}
