//! PostgreSQL-backed `TaskRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::{Task, TaskId, TaskStatus, WorkspaceId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::TaskRow;
use super::pool::{DbPool, PoolError};
use super::schema::{projects, tasks};

#[derive(Clone)]
pub struct DieselTaskRepository {
    pool: DbPool,
}

impl DieselTaskRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TaskRepositoryError {
    map_basic_pool_error(error, TaskRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TaskRepositoryError {
    map_basic_diesel_error(
        error,
        TaskRepositoryError::query,
        TaskRepositoryError::connection,
    )
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn workspace_of(&self, task: TaskId) -> Result<Option<WorkspaceId>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let workspace_id: Option<i64> = tasks::table
            .inner_join(projects::table)
            .filter(tasks::id.eq(task.get()))
            .select(projects::workspace_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(workspace_id.map(WorkspaceId::new))
    }

    async fn update_status(
        &self,
        task: TaskId,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TaskRow> = diesel::update(tasks::table.find(task.get()))
            .set((
                tasks::status.eq(status.as_str()),
                tasks::completed.eq(status.is_completed()),
                tasks::updated_at.eq(now),
            ))
            .returning(TaskRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| row.into_task().map_err(TaskRepositoryError::query))
            .transpose()
    }
}
