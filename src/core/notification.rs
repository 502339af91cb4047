//! Owner notification feed.
//!
//! Notifications are raised inside the transaction of the event that caused
//! them (complaint filed, payment submitted) and are only ever mutated to
//! flip the read flag.

use crate::auth::{self, Identity};
use crate::entities::{Notification, NotificationKind, notification};
use crate::errors::{Error, Result};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use tracing::instrument;

/// How many notifications the feed returns at a time.
const FEED_LIMIT: u64 = 20;

/// The owner's notification feed with its unread badge count.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationFeed {
    /// Newest notifications, most recent first
    pub notifications: Vec<notification::Model>,
    /// Number of unread notifications across the whole feed
    pub unread_count: u64,
}

/// Records an event for an owner. Runs on the caller's connection so event
/// and notification commit together.
pub(crate) async fn notify_owner<C: ConnectionTrait>(
    db: &C,
    owner_id: i64,
    kind: NotificationKind,
    title: &str,
    body: String,
) -> Result<notification::Model> {
    let model = notification::ActiveModel {
        owner_id: Set(owner_id),
        kind: Set(kind),
        title: Set(title.to_string()),
        body: Set(body),
        is_read: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Returns the newest notifications for the caller plus the unread count.
#[instrument(skip(db, identity))]
pub async fn list_notifications(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<NotificationFeed> {
    let owner = auth::require_owner(db, identity).await?;

    let notifications = Notification::find()
        .filter(notification::Column::OwnerId.eq(owner.id))
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id)
        .limit(FEED_LIMIT)
        .all(db)
        .await?;

    let unread_count = Notification::find()
        .filter(notification::Column::OwnerId.eq(owner.id))
        .filter(notification::Column::IsRead.eq(false))
        .count(db)
        .await?;

    Ok(NotificationFeed {
        notifications,
        unread_count,
    })
}

/// Marks one notification as read.
#[instrument(skip(db, identity))]
pub async fn mark_read(
    db: &DatabaseConnection,
    identity: &Identity,
    notification_id: i64,
) -> Result<notification::Model> {
    let owner = auth::require_owner(db, identity).await?;

    let found = Notification::find_by_id(notification_id)
        .one(db)
        .await?
        .filter(|n| n.owner_id == owner.id)
        .ok_or_else(|| Error::NotFound {
            entity: "notification",
            id: notification_id.to_string(),
        })?;

    let mut active_model: notification::ActiveModel = found.into();
    active_model.is_read = Set(true);
    active_model.update(db).await.map_err(Into::into)
}

/// Marks every unread notification of the caller as read, returning how many
/// were flipped.
#[instrument(skip(db, identity))]
pub async fn mark_all_read(db: &DatabaseConnection, identity: &Identity) -> Result<u64> {
    let owner = auth::require_owner(db, identity).await?;

    let result = Notification::update_many()
        .col_expr(notification::Column::IsRead, Expr::value(true))
        .filter(notification::Column::OwnerId.eq(owner.id))
        .filter(notification::Column::IsRead.eq(false))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
