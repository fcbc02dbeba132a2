//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// User accounts table.
    ///
    /// The `email` column carries a unique index; privilege flags are
    /// persisted but always re-derived from `role` when rows are read back.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique, lowercased identity key.
        email -> Varchar,
        /// Optional display name.
        name -> Nullable<Varchar>,
        /// Role tag: employee | recruiter | subadmin | superadmin.
        role -> Varchar,
        /// Staff flag derived from the role.
        is_staff -> Bool,
        /// Superuser flag derived from the role.
        is_superuser -> Bool,
        /// Whether the account may authenticate.
        is_active -> Bool,
        /// Opaque password hash produced by the hashing adapter.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Employee profiles, one per user with the employee role.
    employees (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user (unique, cascade on delete).
        user_id -> Uuid,
        /// Reference to an uploaded resume artifact.
        resume -> Nullable<Varchar>,
        /// Contact phone number.
        phone_number -> Varchar,
        /// Free-form location.
        location -> Varchar,
    }
}

diesel::table! {
    /// Recruiter profiles, one per user with the recruiter role.
    recruiters (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user (unique, cascade on delete).
        user_id -> Uuid,
        /// Company name shown on postings.
        company_name -> Varchar,
        /// Company website.
        website -> Nullable<Varchar>,
        /// Reference to an uploaded logo artifact.
        logo -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Job postings owned by recruiters.
    jobs (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning recruiter profile (cascade on delete).
        recruiter_id -> Uuid,
        /// Position title.
        title -> Varchar,
        /// Long-form description.
        description -> Text,
        /// Free-form location.
        location -> Varchar,
        /// Employment arrangement tag.
        job_type -> Varchar,
        /// Advertised salary in whole currency units.
        salary -> Nullable<Int8>,
        /// Set once when the posting is created.
        posted_at -> Timestamptz,
        /// Optional application deadline.
        application_deadline -> Nullable<Timestamptz>,
        /// Whether the posting is visible to job seekers.
        is_active -> Bool,
    }
}

diesel::table! {
    /// Applications joining employees to jobs.
    ///
    /// A unique index over `(employee_id, job_id)` enforces one application
    /// per pair at the storage layer.
    applications (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Applying employee profile (cascade on delete).
        employee_id -> Uuid,
        /// Target job (cascade on delete).
        job_id -> Uuid,
        /// Optional cover letter.
        cover_letter -> Nullable<Text>,
        /// Set once on submission.
        submitted_at -> Timestamptz,
        /// Review status tag.
        status -> Varchar,
        /// User who performed the most recent status change.
        status_changed_by -> Nullable<Uuid>,
        /// Soft-delete flag.
        is_active -> Bool,
    }
}

diesel::joinable!(employees -> users (user_id));
diesel::joinable!(recruiters -> users (user_id));
diesel::joinable!(jobs -> recruiters (recruiter_id));
diesel::joinable!(applications -> employees (employee_id));
diesel::joinable!(applications -> jobs (job_id));

diesel::allow_tables_to_appear_in_same_query!(users, employees, recruiters, jobs, applications);
