//! Outbound notification payloads.
//!
//! State changes never send email inline: they enqueue one of these typed
//! payloads and a separate worker delivers it. Each variant carries the
//! recipient address plus the literal fields the rendered message needs,
//! including the identifier used to build a deep link back into the site.

use serde::{Deserialize, Serialize};

use super::application::{ApplicationId, ApplicationStatus};
use super::job::JobId;
use super::role::Role;
use super::user::EmailAddress;

/// Category of an outbound notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Sent to a freshly signed-up user.
    Welcome,
    /// Sent to a recruiter when someone applies to their job.
    NewApplication,
    /// Sent to an employee when their application's status changes.
    StatusUpdate,
}

/// A single outbound notification awaiting delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Greets a new account.
    Welcome {
        /// Delivery address.
        recipient: EmailAddress,
        /// Display name, when the user provided one.
        name: Option<String>,
        /// Role chosen at signup.
        role: Role,
    },
    /// Tells a recruiter about a fresh application.
    NewApplication {
        /// Delivery address (the job's owning recruiter).
        recipient: EmailAddress,
        /// Applicant display name.
        applicant_name: String,
        /// Title of the job applied to.
        job_title: String,
        /// Deep-link target.
        job_id: JobId,
    },
    /// Tells an employee their application moved.
    StatusUpdate {
        /// Delivery address (the applying employee).
        recipient: EmailAddress,
        /// Status before the transition.
        previous_status: ApplicationStatus,
        /// Status after the transition.
        new_status: ApplicationStatus,
        /// Title of the job applied to.
        job_title: String,
        /// Deep-link target.
        application_id: ApplicationId,
    },
}

impl Notification {
    /// Category of this notification.
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::Welcome { .. } => NotificationKind::Welcome,
            Self::NewApplication { .. } => NotificationKind::NewApplication,
            Self::StatusUpdate { .. } => NotificationKind::StatusUpdate,
        }
    }

    /// Delivery address.
    pub const fn recipient(&self) -> &EmailAddress {
        match self {
            Self::Welcome { recipient, .. }
            | Self::NewApplication { recipient, .. }
            | Self::StatusUpdate { recipient, .. } => recipient,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw).expect("valid email")
    }

    #[test]
    fn kind_matches_variant() {
        let welcome = Notification::Welcome {
            recipient: email("a@b.c"),
            name: None,
            role: Role::Employee,
        };
        assert_eq!(welcome.kind(), NotificationKind::Welcome);
        assert_eq!(welcome.recipient().as_ref(), "a@b.c");
    }

    #[test]
    fn payloads_serialise_with_a_kind_tag() {
        let note = Notification::StatusUpdate {
            recipient: email("a@b.c"),
            previous_status: ApplicationStatus::Submitted,
            new_status: ApplicationStatus::Interview,
            job_title: "Backend Developer".to_owned(),
            application_id: ApplicationId::random(),
        };
        let value = serde_json::to_value(&note).expect("serialise notification");
        assert_eq!(
            value.get("kind").and_then(serde_json::Value::as_str),
            Some("status_update")
        );
        let parsed: Notification = serde_json::from_value(value).expect("parse notification");
        assert_eq!(parsed, note);
    }
}
