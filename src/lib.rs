//! `Koshub` - A boarding-house (kos) management backend
//!
//! This crate provides the full management core for a boarding house:
//! room inventory with occupancy tracking, tenant onboarding and offboarding,
//! a monthly rent ledger with proof-of-transfer verification, complaint
//! ticketing with an owner notification feed, and dashboard aggregates.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Style consistency
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::must_use_candidate,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// Identity gate - bearer-token authentication, role scoping, login provisioning
pub mod auth;
/// Blob store seam - trait plus filesystem and in-memory implementations
pub mod blob;
/// Configuration management for database and application settings
pub mod config;
/// Core business logic - framework-agnostic room, tenancy, rent, complaint,
/// notification, and dashboard operations
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// HTTP interface - axum router, handlers, and shared application state
pub mod http;

#[cfg(test)]
pub mod test_utils;
