//! User identity aggregate.
//!
//! A user is identified by a unique, normalised email address and carries a
//! role plus the privilege flags derived from it. Constructors re-derive the
//! flags so an instance can never hold a pair inconsistent with its role.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::role::{PrivilegeFlags, Role};

/// Validation errors returned by the identity constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacked the minimal `local@domain` shape.
    #[error("email must contain a local part and a domain")]
    MalformedEmail,
    /// Display name was provided but blank once trimmed.
    #[error("name must not be blank when provided")]
    BlankName,
}

/// Stable user identifier stored as a UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Normalised email address used as the identity key.
///
/// ## Invariants
/// - trimmed, lowercased, non-empty
/// - contains exactly the minimal `local@domain` shape (full RFC validation
///   is delegated to the delivery side)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let mut parts = normalised.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::MalformedEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user.
///
/// ## Invariants
/// - `flags` always equal [`PrivilegeFlags::for_role`] of the current role.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    name: Option<String>,
    role: Role,
    flags: PrivilegeFlags,
    is_active: bool,
}

impl User {
    /// Build a new active user, deriving the privilege flags from the role.
    pub fn new(email: EmailAddress, name: Option<String>, role: Role) -> Self {
        Self::from_parts(UserId::random(), email, name, role, true)
    }

    /// Rebuild a user from persisted parts.
    ///
    /// The stored flag pair is intentionally ignored: flags are re-derived
    /// from the role so stale rows cannot resurrect drifted privileges.
    pub fn from_parts(
        id: UserId,
        email: EmailAddress,
        name: Option<String>,
        role: Role,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            email,
            name,
            role,
            flags: PrivilegeFlags::for_role(role),
            is_active,
        }
    }

    /// Stable identifier.
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Identity key.
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Optional display name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Display name falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.email.as_ref())
    }

    /// Current role.
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Privilege flags derived from the current role.
    pub const fn flags(&self) -> PrivilegeFlags {
        self.flags
    }

    /// Whether the account may authenticate.
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Change the role, re-deriving the privilege flags.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.flags = PrivilegeFlags::for_role(role);
    }

    /// Activate or deactivate the account.
    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }

    /// Replace the display name, rejecting blank values.
    pub fn set_name(&mut self, name: Option<String>) -> Result<(), UserValidationError> {
        if let Some(value) = &name
            && value.trim().is_empty()
        {
            return Err(UserValidationError::BlankName);
        }
        self.name = name;
        Ok(())
    }
}
