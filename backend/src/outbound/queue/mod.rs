//! Notification queue adapters.
//!
//! The production adapter pushes jobs into PostgreSQL through Apalis; the
//! worker binary drains them. The stub adapter logs and discards, which
//! keeps database-less development running with the same wiring.

use async_trait::async_trait;
use apalis_core::backend::TaskSink;
use apalis_postgres::PostgresStorage;

use crate::domain::notification::Notification;
use crate::domain::ports::{NotificationDispatchError, NotificationQueue};

/// Apalis-backed notification queue persisting jobs in PostgreSQL.
///
/// Enqueueing is the only responsibility here: delivery, retries, and
/// backoff belong to the worker consuming the storage.
#[derive(Clone)]
pub struct ApalisNotificationQueue {
    storage: PostgresStorage<Notification>,
}

impl ApalisNotificationQueue {
    /// Connect to the queue database and prepare the Apalis schema.
    pub async fn connect(database_url: &str) -> Result<Self, NotificationDispatchError> {
        let pool = sqlx::PgPool::connect(database_url)
            .await
            .map_err(|err| NotificationDispatchError::dispatch(err.to_string()))?;
        PostgresStorage::setup(&pool)
            .await
            .map_err(|err| NotificationDispatchError::dispatch(err.to_string()))?;
        Ok(Self {
            storage: PostgresStorage::new(&pool),
        })
    }

    /// Wrap an existing storage handle (shared with the worker).
    pub fn from_storage(storage: PostgresStorage<Notification>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl NotificationQueue for ApalisNotificationQueue {
    async fn enqueue(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationDispatchError> {
        let mut storage = self.storage.clone();
        storage
            .push(notification.clone())
            .await
            .map(|_| ())
            .map_err(|err| NotificationDispatchError::dispatch(err.to_string()))
    }
}

/// Stub queue that discards all notifications.
///
/// Lets the application run without a queue backend; every enqueue succeeds
/// but nothing is delivered, and a warning makes the discard visible.
#[derive(Debug, Clone, Default)]
pub struct StubNotificationQueue;

impl StubNotificationQueue {
    /// Create a new stub queue instance.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationQueue for StubNotificationQueue {
    async fn enqueue(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationDispatchError> {
        tracing::warn!(
            kind = ?notification.kind(),
            recipient = %notification.recipient(),
            "StubNotificationQueue: notification discarded (queue backend not configured)"
        );
        Ok(())
    }
}

/// Concrete queue backend selected by server configuration.
///
/// Lets the service wiring stay monomorphic while the deployment chooses
/// between the real broker and the discarding stub.
#[derive(Clone)]
pub enum NotificationQueueBackend {
    /// PostgreSQL-backed Apalis queue.
    Apalis(ApalisNotificationQueue),
    /// Log-and-discard stub.
    Stub(StubNotificationQueue),
}

#[async_trait]
impl NotificationQueue for NotificationQueueBackend {
    async fn enqueue(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationDispatchError> {
        match self {
            Self::Apalis(queue) => queue.enqueue(notification).await,
            Self::Stub(queue) => queue.enqueue(notification).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::role::Role;
    use crate::domain::user::EmailAddress;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn stub_queue_enqueue_succeeds() {
        let queue = StubNotificationQueue::new();
        let note = Notification::Welcome {
            recipient: EmailAddress::new("a@b.c").expect("valid email"),
            name: None,
            role: Role::Employee,
        };

        let result = queue.enqueue(&note).await;
        assert!(result.is_ok(), "stub queue enqueue should succeed");
    }
}
