//! Core business logic - framework-agnostic operations over the entities.
//!
//! Every function here takes the caller's resolved [`crate::auth::Identity`]
//! and re-derives owner/tenant scope from it before touching anything else.
//! The only multi-entity atomic writes live in [`tenancy`]; everything else
//! is a single-row write or a read.

/// Complaint ticketing and triage
pub mod complaint;
/// Read-only dashboard aggregates
pub mod dashboard;
/// Owner notification feed
pub mod notification;
/// Owner account registration and profile
pub mod owner;
/// Monthly rent ledger - submission and verification
pub mod rent;
/// Room inventory and occupancy status
pub mod room;
/// Tenant onboarding and offboarding transactions
pub mod tenancy;
