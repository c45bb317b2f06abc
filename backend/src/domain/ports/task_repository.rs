//! Port for task status transitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Task, TaskId, TaskStatus, WorkspaceId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by task repository adapters.
    pub enum TaskRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "task repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "task repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Workspace owning the task's project, or `None` for an unknown task.
    async fn workspace_of(&self, task: TaskId) -> Result<Option<WorkspaceId>, TaskRepositoryError>;

    /// Write `status`, the matching `completed` flag and `updated_at = now`.
    ///
    /// Returns `None` when the task no longer exists.
    async fn update_status(
        &self,
        task: TaskId,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskRepositoryError>;
}
