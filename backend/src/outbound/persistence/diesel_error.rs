//! Shared classification of Diesel failures for the repository adapters.
//!
//! Each repository maps the classified failure onto its own port error so
//! domain services only ever see typed variants, never raw Diesel errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Transport-agnostic classification of a database failure.
#[derive(Debug)]
pub(super) enum DbFailure {
    /// The connection dropped or could not be used.
    Connection(String),
    /// A unique constraint rejected the mutation.
    Unique(String),
    /// Any other query failure.
    Query(String),
}

/// Classify a Diesel error, logging the raw cause at debug level.
pub(super) fn classify(error: DieselError) -> DbFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DbFailure::Unique(info.constraint_name().unwrap_or("unique constraint").to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DbFailure::Connection("database connection error".to_owned())
        }
        DieselError::NotFound => DbFailure::Query("record not found".to_owned()),
        _ => DbFailure::Query("database error".to_owned()),
    }
}
