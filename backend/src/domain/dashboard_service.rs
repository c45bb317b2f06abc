//! Dashboard service: aggregates over the caller's visible workspaces.
//!
//! The visible workspace set is resolved once per request and then passed
//! to a single snapshot read, so every counter in [`DashboardStats`] is
//! computed over the same rows.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::authorization::map_workspace_error;
use crate::domain::ports::{
    AnalyticsRepository, AnalyticsRepositoryError, DashboardQuery, WorkspaceRepository,
};
use crate::domain::{weekly_window_start, DashboardStats, Error, UserId};

pub struct DashboardService<W, A> {
    workspaces: Arc<W>,
    analytics: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<W, A> DashboardService<W, A> {
    pub fn new(workspaces: Arc<W>, analytics: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            workspaces,
            analytics,
            clock,
        }
    }
}

fn map_analytics_error(error: AnalyticsRepositoryError) -> Error {
    match error {
        AnalyticsRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("analytics repository unavailable: {message}"))
        }
        AnalyticsRepositoryError::Query { message } => {
            Error::internal(format!("analytics repository error: {message}"))
        }
    }
}

#[async_trait]
impl<W, A> DashboardQuery for DashboardService<W, A>
where
    W: WorkspaceRepository,
    A: AnalyticsRepository,
{
    async fn dashboard(&self, user: UserId) -> Result<DashboardStats, Error> {
        let visible = self
            .workspaces
            .visible_workspace_ids(user)
            .await
            .map_err(map_workspace_error)?;
        if visible.is_empty() {
            debug!(user_id = %user, "dashboard requested with no visible workspaces");
            return Ok(DashboardStats::empty());
        }

        let now = self.clock.utc();
        let snapshot = self
            .analytics
            .task_snapshot(&visible, now, weekly_window_start(now))
            .await
            .map_err(map_analytics_error)?;
        let workspace_count = u64::try_from(visible.len()).unwrap_or(u64::MAX);
        Ok(DashboardStats::from_snapshot(&snapshot, workspace_count))
    }
}
