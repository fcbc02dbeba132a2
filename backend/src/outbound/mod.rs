//! Outbound adapters: persistence, queue, mailer, and credential hashing.

mod argon2_password_hasher;
pub mod mailer;
pub mod persistence;
pub mod queue;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use mailer::{EmailMessage, HttpMailer, MailerError};
pub use queue::{ApalisNotificationQueue, NotificationQueueBackend, StubNotificationQueue};
