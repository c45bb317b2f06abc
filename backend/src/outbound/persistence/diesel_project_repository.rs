//! PostgreSQL-backed `ProjectRepository`.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::{ProjectId, ProjectSummary, WorkspaceId};

use super::diesel_basic_error_mapping::{
    count_to_u64, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::ProjectRow;
use super::pool::{DbPool, PoolError};
use super::schema::{projects, tasks};

/// Diesel-backed project listing with derived task counts.
#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProjectRepositoryError {
    map_basic_pool_error(error, ProjectRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProjectRepositoryError {
    map_basic_diesel_error(
        error,
        ProjectRepositoryError::query,
        ProjectRepositoryError::connection,
    )
}

type ProjectListing = (Vec<ProjectRow>, Vec<(i64, i64)>, Vec<(i64, i64)>);

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn list_with_counts(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<ProjectSummary>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = workspace_id.get();

        // Rows and counts come from one snapshot so counts match the listing.
        let (rows, totals, completed): ProjectListing = conn
            .transaction(|conn| {
                async move {
                    let rows: Vec<ProjectRow> = projects::table
                        .filter(projects::workspace_id.eq(id))
                        .order((projects::created_at.desc(), projects::id.desc()))
                        .select(ProjectRow::as_select())
                        .load(conn)
                        .await?;
                    let totals: Vec<(i64, i64)> = tasks::table
                        .inner_join(projects::table)
                        .filter(projects::workspace_id.eq(id))
                        .group_by(tasks::project_id)
                        .select((tasks::project_id, count_star()))
                        .load(conn)
                        .await?;
                    let completed: Vec<(i64, i64)> = tasks::table
                        .inner_join(projects::table)
                        .filter(projects::workspace_id.eq(id))
                        .filter(tasks::completed.eq(true))
                        .group_by(tasks::project_id)
                        .select((tasks::project_id, count_star()))
                        .load(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>((rows, totals, completed))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let totals: HashMap<i64, i64> = totals.into_iter().collect();
        let completed: HashMap<i64, i64> = completed.into_iter().collect();

        Ok(rows
            .into_iter()
            .map(|row| ProjectSummary {
                id: ProjectId::new(row.id),
                workspace_id: WorkspaceId::new(row.workspace_id),
                task_count: count_to_u64(totals.get(&row.id).copied().unwrap_or(0)),
                completed_count: count_to_u64(completed.get(&row.id).copied().unwrap_or(0)),
                name: row.name,
                description: row.description,
                color: row.color,
                created_at: row.created_at,
            })
            .collect())
    }
}
