//! Port for dashboard aggregates.
//!
//! Adapters read every aggregate in one consistent snapshot over the exact
//! workspace set passed in, so counters cannot drift between queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{TaskSnapshot, WorkspaceId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by analytics repository adapters.
    pub enum AnalyticsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "analytics repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "analytics repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Aggregate tasks and projects of `workspaces`.
    ///
    /// Overdue means `due_date < now` and not done. Completions are the
    /// `updated_at` values of done tasks with `since <= updated_at <= now`.
    async fn task_snapshot(
        &self,
        workspaces: &[WorkspaceId],
        now: DateTime<Utc>,
        since: DateTime<Utc>,
    ) -> Result<TaskSnapshot, AnalyticsRepositoryError>;
}
