//! Driving port for the analytics dashboard.

use async_trait::async_trait;

use crate::domain::{DashboardStats, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Aggregate statistics over every workspace visible to `user`.
    async fn dashboard(&self, user: UserId) -> Result<DashboardStats, Error>;
}
