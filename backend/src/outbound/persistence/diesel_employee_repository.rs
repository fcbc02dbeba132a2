//! PostgreSQL-backed `EmployeeRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::page::Page;
use crate::domain::ports::{EmployeePersistenceError, EmployeeRepository};
use crate::domain::profile::{EmployeeId, EmployeeProfile};
use crate::domain::user::UserId;

use super::diesel_error::{DbFailure, classify};
use super::models::{EmployeeRow, EmployeeUpsert};
use super::pool::{DbPool, PoolError};
use super::schema::employees;

/// Diesel-backed implementation of the `EmployeeRepository` port.
#[derive(Clone)]
pub struct DieselEmployeeRepository {
    pool: DbPool,
}

impl DieselEmployeeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EmployeePersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            EmployeePersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> EmployeePersistenceError {
    match classify(error) {
        DbFailure::Connection(message) => EmployeePersistenceError::connection(message),
        DbFailure::Unique(constraint) => EmployeePersistenceError::query(format!(
            "unique constraint violated: {constraint}"
        )),
        DbFailure::Query(message) => EmployeePersistenceError::query(message),
    }
}

fn row_to_profile(row: EmployeeRow) -> EmployeeProfile {
    EmployeeProfile {
        id: EmployeeId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        resume: row.resume,
        phone_number: row.phone_number,
        location: row.location,
    }
}

#[async_trait]
impl EmployeeRepository for DieselEmployeeRepository {
    async fn upsert(&self, profile: &EmployeeProfile) -> Result<(), EmployeePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = EmployeeUpsert {
            id: *profile.id.as_uuid(),
            user_id: *profile.user_id.as_uuid(),
            resume: profile.resume.as_deref(),
            phone_number: &profile.phone_number,
            location: &profile.location,
        };

        // One profile per user: collide on the owning user, not the id.
        diesel::insert_into(employees::table)
            .values(&row)
            .on_conflict(employees::user_id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<EmployeeProfile>, EmployeePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EmployeeRow> = employees::table
            .filter(employees::user_id.eq(user_id.as_uuid()))
            .select(EmployeeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_profile))
    }

    async fn find_by_id(
        &self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeProfile>, EmployeePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EmployeeRow> = employees::table
            .find(id.as_uuid())
            .select(EmployeeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_profile))
    }

    async fn list(&self, page: Page) -> Result<Vec<EmployeeProfile>, EmployeePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EmployeeRow> = employees::table
            .order(employees::user_id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(EmployeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_profile).collect())
    }
}
