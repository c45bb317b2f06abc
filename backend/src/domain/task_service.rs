//! Task status service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    TaskRepository, TaskRepositoryError, TaskStatusCommand, WorkspaceRepository,
};
use crate::domain::{
    Capability, Error, Task, TaskId, TaskStatus, UserId, WorkspaceGuard, ACCESS_DENIED,
};

/// Moves tasks between statuses for workspace members.
///
/// An unknown task and a task in a foreign workspace produce the same
/// `Forbidden` error, so task ids cannot be probed across tenants.
pub struct TaskStatusService<T, W> {
    tasks: Arc<T>,
    guard: WorkspaceGuard<W>,
    clock: Arc<dyn Clock>,
}

impl<T, W> TaskStatusService<T, W>
where
    W: WorkspaceRepository,
{
    pub fn new(tasks: Arc<T>, workspaces: Arc<W>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks,
            guard: WorkspaceGuard::new(workspaces),
            clock,
        }
    }
}

fn map_task_error(error: TaskRepositoryError) -> Error {
    match error {
        TaskRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("task repository unavailable: {message}"))
        }
        TaskRepositoryError::Query { message } => {
            Error::internal(format!("task repository error: {message}"))
        }
    }
}

#[async_trait]
impl<T, W> TaskStatusCommand for TaskStatusService<T, W>
where
    T: TaskRepository,
    W: WorkspaceRepository,
{
    async fn update_status(
        &self,
        user: UserId,
        task: TaskId,
        status: TaskStatus,
    ) -> Result<Task, Error> {
        let Some(workspace_id) = self.tasks.workspace_of(task).await.map_err(map_task_error)?
        else {
            debug!(user_id = %user, task_id = %task, "status update for unknown task");
            return Err(Error::forbidden(ACCESS_DENIED));
        };
        self.guard
            .require(user, workspace_id, Capability::View)
            .await?;

        let updated = self
            .tasks
            .update_status(task, status, self.clock.utc())
            .await
            .map_err(map_task_error)?
            .ok_or_else(|| Error::forbidden(ACCESS_DENIED))?;
        info!(task_id = %task, %status, user_id = %user, "task status updated");
        Ok(updated)
    }
}
