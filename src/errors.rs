//! Unified error types for the whole crate.
//!
//! Every operation recovers failures into one of these variants at its
//! boundary; nothing is left as an uncaught fault. Each variant carries a
//! human-readable message suitable for direct display, distinct from the
//! error kind itself.

use thiserror::Error;

/// Crate-wide error type covering the full domain taxonomy plus
/// infrastructure failures.
#[derive(Debug, Error)]
pub enum Error {
    /// No valid caller identity; rejected before any domain logic runs.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The caller's role or scope does not cover the requested operation.
    /// Distinct from [`Error::NotFound`]: forbidden is not absent.
    #[error("Not authorized: {reason}")]
    Unauthorized {
        /// Why the caller's role/scope was insufficient.
        reason: String,
    },

    /// Malformed input, with the offending field preserved.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the field that failed validation.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// A write would violate an invariant (duplicate room number, occupied
    /// room, double archive, duplicate login email, ...).
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflicting state.
        message: String,
    },

    /// The referenced entity does not exist or is outside the caller's scope.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up.
        entity: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// A complaint status change that skips ahead or moves backward.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Status the complaint currently has.
        from: String,
        /// Status that was requested.
        to: String,
    },

    /// A consumed external service (blob store) failed; the surrounding
    /// operation is rolled back, never partially applied.
    #[error("{service} failure: {message}")]
    Dependency {
        /// Which external service failed.
        service: &'static str,
        /// The underlying failure description.
        message: String,
    },

    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration.
        message: String,
    },

    /// Persistent store error surfaced from SeaORM.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (config files, upload directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
