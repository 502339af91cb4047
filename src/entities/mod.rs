//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod complaint;
pub mod notification;
pub mod owner;
pub mod payment;
pub mod room;
pub mod tenant;
pub mod user;

// Re-export specific types to avoid conflicts
pub use complaint::{
    Column as ComplaintColumn, ComplaintStatus, Entity as Complaint, Model as ComplaintModel,
};
pub use notification::{
    Column as NotificationColumn, Entity as Notification, Model as NotificationModel,
    NotificationKind,
};
pub use owner::{Column as OwnerColumn, Entity as Owner, Model as OwnerModel};
pub use payment::{
    Column as PaymentColumn, Entity as Payment, Model as PaymentModel, PaymentStatus,
};
pub use room::{
    Amenities, Column as RoomColumn, Entity as Room, Model as RoomModel, RoomStatus, RoomType,
};
pub use tenant::{Column as TenantColumn, Entity as Tenant, LeaseStatus, Model as TenantModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, UserRole};
