//! PostgreSQL-backed `RecruiterRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::page::Page;
use crate::domain::ports::{RecruiterPersistenceError, RecruiterRepository};
use crate::domain::profile::{RecruiterId, RecruiterProfile};
use crate::domain::user::UserId;

use super::diesel_error::{DbFailure, classify};
use super::models::{RecruiterRow, RecruiterUpsert};
use super::pool::{DbPool, PoolError};
use super::schema::recruiters;

/// Diesel-backed implementation of the `RecruiterRepository` port.
#[derive(Clone)]
pub struct DieselRecruiterRepository {
    pool: DbPool,
}

impl DieselRecruiterRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecruiterPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RecruiterPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> RecruiterPersistenceError {
    match classify(error) {
        DbFailure::Connection(message) => RecruiterPersistenceError::connection(message),
        DbFailure::Unique(constraint) => RecruiterPersistenceError::query(format!(
            "unique constraint violated: {constraint}"
        )),
        DbFailure::Query(message) => RecruiterPersistenceError::query(message),
    }
}

fn row_to_profile(row: RecruiterRow) -> RecruiterProfile {
    RecruiterProfile {
        id: RecruiterId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        company_name: row.company_name,
        website: row.website,
        logo: row.logo,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl RecruiterRepository for DieselRecruiterRepository {
    async fn upsert(&self, profile: &RecruiterProfile) -> Result<(), RecruiterPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = RecruiterUpsert {
            id: *profile.id.as_uuid(),
            user_id: *profile.user_id.as_uuid(),
            company_name: &profile.company_name,
            website: profile.website.as_deref(),
            logo: profile.logo.as_deref(),
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        };

        // One profile per user: collide on the owning user, not the id.
        diesel::insert_into(recruiters::table)
            .values(&row)
            .on_conflict(recruiters::user_id)
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
    ) -> Result<Option<RecruiterProfile>, RecruiterPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecruiterRow> = recruiters::table
            .filter(recruiters::user_id.eq(user_id.as_uuid()))
            .select(RecruiterRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_profile))
    }

    async fn find_by_id(
        &self,
        id: RecruiterId,
    ) -> Result<Option<RecruiterProfile>, RecruiterPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecruiterRow> = recruiters::table
            .find(id.as_uuid())
            .select(RecruiterRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_profile))
    }

    async fn list(&self, page: Page) -> Result<Vec<RecruiterProfile>, RecruiterPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RecruiterRow> = recruiters::table
            .order(recruiters::created_at.desc())
            .limit(page.limit())
            .offset(page.offset())
            .select(RecruiterRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_profile).collect())
    }
}
