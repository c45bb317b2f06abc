//! Notification feed service over the notification repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{NotificationFeed, NotificationRepository, NotificationRepositoryError};
use crate::domain::{Error, Notification, NotificationId, UserId};

/// Serves a user's own notifications and nothing else.
#[derive(Clone)]
pub struct NotificationService<N> {
    notifications: Arc<N>,
}

impl<N> NotificationService<N> {
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

fn map_notification_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

#[async_trait]
impl<N> NotificationFeed for NotificationService<N>
where
    N: NotificationRepository,
{
    async fn list(&self, user: UserId) -> Result<Vec<Notification>, Error> {
        self.notifications
            .list_for(user)
            .await
            .map_err(map_notification_error)
    }

    async fn unread_count(&self, user: UserId) -> Result<u64, Error> {
        self.notifications
            .unread_count(user)
            .await
            .map_err(map_notification_error)
    }

    async fn mark_read(&self, user: UserId, id: NotificationId) -> Result<(), Error> {
        let matched = self
            .notifications
            .mark_read(user, id)
            .await
            .map_err(map_notification_error)?;
        if !matched {
            debug!(user_id = %user, notification_id = %id, "mark-read matched no notification");
        }
        Ok(())
    }
}
