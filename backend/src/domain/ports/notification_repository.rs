//! Port for the per-user notification feed.
//!
//! Entries are append-only; the only mutation is the recipient flipping
//! `is_read` to true.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewNotification, Notification, NotificationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Append an unread entry created at `now`.
    async fn append(
        &self,
        notification: &NewNotification,
        now: DateTime<Utc>,
    ) -> Result<Notification, NotificationRepositoryError>;

    /// The recipient's entries, newest first.
    async fn list_for(&self, user: UserId) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Number of unread entries for the recipient.
    async fn unread_count(&self, user: UserId) -> Result<u64, NotificationRepositoryError>;

    /// Mark an entry read when it belongs to `user`.
    ///
    /// Returns whether a row matched; a foreign or unknown id matches nothing.
    async fn mark_read(
        &self,
        user: UserId,
        id: NotificationId,
    ) -> Result<bool, NotificationRepositoryError>;
}
