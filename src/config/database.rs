//! Database configuration module for `Koshub`.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without manual SQL. The one constraint the
//! entity derives cannot express - the per-owner uniqueness of room numbers -
//! is added as an explicit composite unique index.

use crate::entities::{Complaint, Notification, Owner, Payment, Room, Tenant, User, room};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the `SQLite` database at the given URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation
/// from entity definitions, plus the composite unique index on
/// `(owner_id, room_number)`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut owner_table = schema.create_table_from_entity(Owner);
    let mut room_table = schema.create_table_from_entity(Room);
    let mut tenant_table = schema.create_table_from_entity(Tenant);
    let mut payment_table = schema.create_table_from_entity(Payment);
    let mut complaint_table = schema.create_table_from_entity(Complaint);
    let mut notification_table = schema.create_table_from_entity(Notification);

    db.execute(builder.build(user_table.if_not_exists())).await?;
    db.execute(builder.build(owner_table.if_not_exists())).await?;
    db.execute(builder.build(room_table.if_not_exists())).await?;
    db.execute(builder.build(tenant_table.if_not_exists())).await?;
    db.execute(builder.build(payment_table.if_not_exists())).await?;
    db.execute(builder.build(complaint_table.if_not_exists())).await?;
    db.execute(builder.build(notification_table.if_not_exists()))
        .await?;

    let room_number_unique = Index::create()
        .name("idx_rooms_owner_room_number")
        .table(Room)
        .col(room::Column::OwnerId)
        .col(room::Column::RoomNumber)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&room_number_unique)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        complaint::Model as ComplaintModel, notification::Model as NotificationModel,
        owner::Model as OwnerModel, payment::Model as PaymentModel, room::Model as RoomModel,
        tenant::Model as TenantModel, user::Model as UserModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<OwnerModel> = Owner::find().limit(1).all(&db).await?;
        let _: Vec<RoomModel> = Room::find().limit(1).all(&db).await?;
        let _: Vec<TenantModel> = Tenant::find().limit(1).all(&db).await?;
        let _: Vec<PaymentModel> = Payment::find().limit(1).all(&db).await?;
        let _: Vec<ComplaintModel> = Complaint::find().limit(1).all(&db).await?;
        let _: Vec<NotificationModel> = Notification::find().limit(1).all(&db).await?;

        Ok(())
    }
}
