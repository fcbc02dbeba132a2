//! Driving port for signup and authentication use-cases.
//!
//! Inbound adapters call this port to create accounts and verify
//! credentials without importing the backing repositories, which keeps
//! handler tests deterministic with a test double.

use async_trait::async_trait;

use crate::domain::role::Role;
use crate::domain::user::{EmailAddress, User, UserId};
use crate::domain::Error;

/// Validated signup payload.
///
/// Password confirmation is an inbound concern: by the time a request
/// reaches this port the two fields have already been compared.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupRequest {
    /// Identity key for the new account.
    pub email: EmailAddress,
    /// Optional display name.
    pub name: Option<String>,
    /// Plaintext password, hashed behind the `PasswordHasher` port.
    pub password: String,
    /// Role chosen at signup time.
    pub role: Role,
}

/// Domain use-case port for account management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Create an account plus its role-matching empty profile and schedule
    /// the welcome notification.
    ///
    /// A taken email is reported as a conflict.
    async fn sign_up(&self, request: SignupRequest) -> Result<User, Error>;

    /// Verify credentials and return the authenticated user.
    ///
    /// Unknown emails, wrong passwords, and deactivated accounts are all
    /// reported as the same unauthorized denial.
    async fn authenticate(&self, email: &EmailAddress, password: &str) -> Result<User, Error>;

    /// Fetch the user behind a session.
    async fn fetch_user(&self, id: UserId) -> Result<User, Error>;
}
