//! HTTP mailer used by the notifications worker.
//!
//! Renders each notification kind into a subject plus text and HTML bodies
//! and POSTs them as JSON to the configured mail-delivery endpoint. Deep
//! links are built from the public site URL so recipients land back on the
//! job or application the message is about.

use serde::Serialize;
use url::Url;

use crate::domain::application::ApplicationId;
use crate::domain::job::JobId;
use crate::domain::notification::Notification;

/// Errors raised while rendering or delivering an email.
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    /// A deep link could not be built from the site URL.
    #[error("failed to build deep link: {0}")]
    Link(#[from] url::ParseError),
    /// The delivery endpoint rejected the message or was unreachable.
    #[error("mail delivery failed: {0}")]
    Delivery(#[from] reqwest::Error),
}

/// Rendered email message as accepted by the delivery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
    /// HTML alternative body.
    pub html: String,
}

/// JSON-over-HTTP mail client.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: Url,
    site_url: Url,
    from: String,
}

impl HttpMailer {
    /// Create a mailer delivering through `endpoint`, linking back to
    /// `site_url`, and sending as `from`.
    pub fn new(endpoint: Url, site_url: Url, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            site_url,
            from: from.into(),
        }
    }

    fn job_link(&self, id: JobId) -> Result<Url, MailerError> {
        Ok(self.site_url.join(&format!("jobs/{id}"))?)
    }

    fn application_link(&self, id: ApplicationId) -> Result<Url, MailerError> {
        Ok(self.site_url.join(&format!("applications/{id}"))?)
    }

    /// Render a notification into a deliverable message.
    pub fn render(&self, notification: &Notification) -> Result<EmailMessage, MailerError> {
        let to = notification.recipient().to_string();
        let (subject, text, html) = match notification {
            Notification::Welcome {
                recipient,
                name,
                role,
            } => {
                let name = name.as_deref().unwrap_or_else(|| recipient.as_ref());
                (
                    "Welcome to Our Platform".to_owned(),
                    format!(
                        "Hi {name}, thank you for signing up as a {role}! \
                         We are excited to have you on board."
                    ),
                    format!(
                        "<html><body>\
                         <h2>Welcome, {name}!</h2>\
                         <p>Thank you for signing up as a <strong>{role}</strong>. \
                         We are excited to have you on board!</p>\
                         <p>Feel free to explore our platform.</p>\
                         <p>Best Regards,<br>Your Job Portal Team</p>\
                         </body></html>"
                    ),
                )
            }
            Notification::NewApplication {
                applicant_name,
                job_title,
                job_id,
                ..
            } => {
                let link = self.job_link(*job_id)?;
                (
                    format!("New Application for {job_title}"),
                    format!(
                        "{applicant_name} has applied for the position of {job_title}. \
                         You can view the job post here: {link}"
                    ),
                    format!(
                        "<html><body>\
                         <p>Dear Recruiter,</p>\
                         <p><strong>{applicant_name}</strong> has applied for the position of \
                         <a href=\"{link}\">{job_title}</a>.</p>\
                         <p>You can view the job post by clicking on the job title above.</p>\
                         <p>Thank you,<br>Your Job Portal Team</p>\
                         </body></html>"
                    ),
                )
            }
            Notification::StatusUpdate {
                previous_status,
                new_status,
                job_title,
                application_id,
                ..
            } => {
                let link = self.application_link(*application_id)?;
                (
                    "Your Application Status has been Updated".to_owned(),
                    format!(
                        "Your application for the position of {job_title} has moved \
                         from {previous_status} to {new_status}. \
                         View it here: {link}"
                    ),
                    format!(
                        "<html><body>\
                         <p>Dear Applicant,</p>\
                         <p>Your application for the position of \
                         <strong>{job_title}</strong> has been updated to:</p>\
                         <p><strong>{new_status}</strong></p>\
                         <p><a href=\"{link}\">View Application</a></p>\
                         <p>Thank you for your interest!<br>Your Job Portal Team</p>\
                         </body></html>"
                    ),
                )
            }
        };

        Ok(EmailMessage {
            from: self.from.clone(),
            to,
            subject,
            text,
            html,
        })
    }

    /// Render and deliver a notification.
    pub async fn deliver(&self, notification: &Notification) -> Result<(), MailerError> {
        let message = self.render(notification)?;
        self.client
            .post(self.endpoint.clone())
            .json(&message)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::application::ApplicationStatus;
    use crate::domain::role::Role;
    use crate::domain::user::EmailAddress;

    fn mailer() -> HttpMailer {
        HttpMailer::new(
            Url::parse("http://mail.internal/send").expect("valid endpoint"),
            Url::parse("https://jobs.example.com/").expect("valid site url"),
            "no-reply@jobs.example.com",
        )
    }

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw).expect("valid email")
    }

    #[test]
    fn welcome_messages_greet_by_name_with_role() {
        let message = mailer()
            .render(&Notification::Welcome {
                recipient: email("ada@example.com"),
                name: Some("Ada".to_owned()),
                role: Role::Recruiter,
            })
            .expect("renders");

        assert_eq!(message.to, "ada@example.com");
        assert_eq!(message.subject, "Welcome to Our Platform");
        assert!(message.text.contains("Hi Ada"));
        assert!(message.text.contains("recruiter"));
    }

    #[test]
    fn new_application_messages_deep_link_to_the_job() {
        let job_id = JobId::random();
        let message = mailer()
            .render(&Notification::NewApplication {
                recipient: email("owner@example.com"),
                applicant_name: "Ada".to_owned(),
                job_title: "Backend Developer".to_owned(),
                job_id,
            })
            .expect("renders");

        assert_eq!(message.subject, "New Application for Backend Developer");
        assert!(message.text.contains(&format!(
            "https://jobs.example.com/jobs/{job_id}"
        )));
        assert!(message.html.contains("Backend Developer"));
    }

    #[test]
    fn status_update_messages_carry_both_statuses_and_the_application_link() {
        let application_id = ApplicationId::random();
        let message = mailer()
            .render(&Notification::StatusUpdate {
                recipient: email("ada@example.com"),
                previous_status: ApplicationStatus::Submitted,
                new_status: ApplicationStatus::Interview,
                job_title: "Backend Developer".to_owned(),
                application_id,
            })
            .expect("renders");

        assert!(message.text.contains("from submitted to interview"));
        assert!(message.text.contains(&format!(
            "https://jobs.example.com/applications/{application_id}"
        )));
    }
}
