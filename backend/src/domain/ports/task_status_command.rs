//! Driving port for moving a task through the workflow.

use async_trait::async_trait;

use crate::domain::{Error, Task, TaskId, TaskStatus, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStatusCommand: Send + Sync {
    /// Set the task's status. Requires view access to its workspace.
    async fn update_status(
        &self,
        user: UserId,
        task: TaskId,
        status: TaskStatus,
    ) -> Result<Task, Error>;
}
