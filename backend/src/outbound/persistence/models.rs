//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{applications, employees, jobs, recruiters, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: Option<&'a str>,
    pub role: &'a str,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub password_hash: &'a str,
}

/// Changeset struct for updating existing user records.
///
/// `name` is doubly optional so clearing the display name writes NULL
/// instead of skipping the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: Option<Option<&'a str>>,
    pub role: &'a str,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Profile models
// ---------------------------------------------------------------------------

/// Row struct for reading from the employees table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmployeeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume: Option<String>,
    pub phone_number: String,
    pub location: String,
}

/// Insertable/upsert struct for employee records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = employees)]
pub(crate) struct EmployeeUpsert<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume: Option<&'a str>,
    pub phone_number: &'a str,
    pub location: &'a str,
}

/// Row struct for reading from the recruiters table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recruiters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecruiterRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable/upsert struct for recruiter records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = recruiters)]
pub(crate) struct RecruiterUpsert<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: &'a str,
    pub website: Option<&'a str>,
    pub logo: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Job models
// ---------------------------------------------------------------------------

/// Row struct for reading from the jobs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JobRow {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub salary: Option<i64>,
    pub posted_at: DateTime<Utc>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Insertable struct for creating new job records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = jobs)]
pub(crate) struct NewJobRow<'a> {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub job_type: &'a str,
    pub salary: Option<i64>,
    pub posted_at: DateTime<Utc>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Changeset struct for updating existing job records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = jobs)]
pub(crate) struct JobUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub job_type: &'a str,
    pub salary: Option<Option<i64>>,
    pub application_deadline: Option<Option<DateTime<Utc>>>,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Application models
// ---------------------------------------------------------------------------

/// Row struct for reading from the applications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationRow {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub status: String,
    pub status_changed_by: Option<Uuid>,
    pub is_active: bool,
}

/// Insertable struct for creating new application records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applications)]
pub(crate) struct NewApplicationRow<'a> {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub job_id: Uuid,
    pub cover_letter: Option<&'a str>,
    pub submitted_at: DateTime<Utc>,
    pub status: &'a str,
    pub status_changed_by: Option<Uuid>,
    pub is_active: bool,
}
