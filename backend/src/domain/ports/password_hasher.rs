//! Port abstraction keeping credential hashing outside the domain.
//!
//! The domain never sees hashing primitives: it hands a plaintext password
//! to this port at signup and at login, and stores/compares only the opaque
//! hash string the adapter produces.

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing a password.
    pub enum PasswordHashError {
        /// The hashing primitive failed.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Outbound port for credential hashing and verification.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into an opaque, self-describing string.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Verify a plaintext password against a stored hash.
    ///
    /// A malformed hash verifies as `false`, never as an error: login must
    /// degrade to a denial, not a crash.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Reversible marker-scheme hasher for tests and database-less development.
///
/// Not a real hash; the `plain:` prefix makes that impossible to miss.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain:") == Some(password)
    }
}
