//! Diesel-backed persistence adapters.

mod diesel_application_repository;
mod diesel_employee_repository;
mod diesel_error;
mod diesel_job_repository;
mod diesel_recruiter_repository;
mod diesel_user_repository;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_application_repository::DieselApplicationRepository;
pub use diesel_employee_repository::DieselEmployeeRepository;
pub use diesel_job_repository::DieselJobRepository;
pub use diesel_recruiter_repository::DieselRecruiterRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// Migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while applying pending migrations at startup.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not open the administrative connection.
    #[error("failed to connect for migrations: {0}")]
    Connection(#[from] diesel::ConnectionError),
    /// A migration failed to apply.
    #[error("failed to run migrations: {0}")]
    Migration(String),
}

/// Apply any pending migrations over a short-lived synchronous connection.
///
/// Runs before the async pool is built, so a half-migrated schema can never
/// serve traffic.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = diesel::PgConnection::establish(database_url)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Migration(err.to_string()))?;
    Ok(())
}
