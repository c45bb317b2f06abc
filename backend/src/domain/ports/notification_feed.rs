//! Driving port for reading and acknowledging notifications.
//!
//! The contract is transport neutral. The HTTP adapter serves it for
//! polling; a push adapter could serve the same trait.

use async_trait::async_trait;

use crate::domain::{Error, Notification, NotificationId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationFeed: Send + Sync {
    /// The user's notifications, newest first.
    async fn list(&self, user: UserId) -> Result<Vec<Notification>, Error>;

    /// Number of unread notifications.
    async fn unread_count(&self, user: UserId) -> Result<u64, Error>;

    /// Mark one notification read. Ids the user does not own are ignored.
    async fn mark_read(&self, user: UserId, id: NotificationId) -> Result<(), Error>;
}
