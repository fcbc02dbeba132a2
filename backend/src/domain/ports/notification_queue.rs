//! Port abstraction for the asynchronous notification dispatch collaborator.
//!
//! Enqueueing is fire-and-forget from the domain's perspective: the services
//! log a dispatch failure and carry on, so a broken queue can never roll
//! back or block the state change that triggered the notification.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::notification::Notification;

use super::define_port_error;

define_port_error! {
    /// Errors raised when handing a notification to the queue.
    pub enum NotificationDispatchError {
        /// The queue rejected or failed to persist the message.
        Dispatch { message: String } => "failed to enqueue notification: {message}",
    }
}

/// Outbound port for scheduling asynchronous notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Hand a notification to the queue without awaiting delivery.
    async fn enqueue(&self, notification: &Notification)
    -> Result<(), NotificationDispatchError>;
}

/// In-memory queue that records everything it is handed.
///
/// Used by tests to assert on scheduled notifications without a broker.
#[derive(Debug, Default)]
pub struct RecordingNotificationQueue {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotificationQueue {
    /// Create an empty recording queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every notification enqueued so far.
    ///
    /// # Panics
    /// Panics if a previous holder of the internal lock panicked.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("recording queue lock").clone()
    }
}

#[async_trait]
impl NotificationQueue for RecordingNotificationQueue {
    async fn enqueue(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationDispatchError> {
        self.sent
            .lock()
            .map_err(|_| NotificationDispatchError::dispatch("recording queue lock poisoned"))?
            .push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::role::Role;
    use crate::domain::user::EmailAddress;

    #[tokio::test]
    async fn recording_queue_captures_notifications_in_order() {
        let queue = RecordingNotificationQueue::new();
        let note = Notification::Welcome {
            recipient: EmailAddress::new("a@b.c").expect("valid email"),
            name: None,
            role: Role::Employee,
        };

        queue.enqueue(&note).await.expect("enqueue succeeds");
        queue.enqueue(&note).await.expect("enqueue succeeds");

        assert_eq!(queue.sent(), vec![note.clone(), note]);
    }
}
