//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::page::Page;
use crate::domain::user::{EmailAddress, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The unique email constraint rejected an insert.
        DuplicateEmail { email: String } => "a user with email {email} already exists",
    }
}

/// Persistence port for user accounts.
///
/// The password hash is handled here rather than on the [`User`] entity so
/// credentials never travel through the domain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user with their password hash.
    ///
    /// The email column is unique; concurrent duplicate signups surface as
    /// [`UserPersistenceError::DuplicateEmail`].
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError>;

    /// Persist changes to an existing user, including re-derived flags.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Delete a user, cascading to owned profiles and applications.
    ///
    /// Returns whether a record was removed.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user together with their stored password hash.
    async fn credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<(User, String)>, UserPersistenceError>;

    /// List users ordered by email.
    async fn list(&self, page: Page) -> Result<Vec<User>, UserPersistenceError>;
}
