//! PostgreSQL-backed `AnalyticsRepository`.
//!
//! All aggregates are read inside one `REPEATABLE READ, READ ONLY`
//! transaction so they observe the same MVCC snapshot.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{AnalyticsRepository, AnalyticsRepositoryError};
use crate::domain::{TaskSnapshot, TaskStatus, WorkspaceId};

use super::diesel_basic_error_mapping::{
    count_to_u64, map_basic_diesel_error, map_basic_pool_error,
};
use super::pool::{DbPool, PoolError};
use super::schema::{projects, tasks};

#[derive(Clone)]
pub struct DieselAnalyticsRepository {
    pool: DbPool,
}

impl DieselAnalyticsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AnalyticsRepositoryError {
    map_basic_pool_error(error, AnalyticsRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AnalyticsRepositoryError {
    map_basic_diesel_error(
        error,
        AnalyticsRepositoryError::query,
        AnalyticsRepositoryError::connection,
    )
}

fn histogram(rows: Vec<(String, i64)>) -> Vec<(String, u64)> {
    rows.into_iter()
        .map(|(label, count)| (label, count_to_u64(count)))
        .collect()
}

struct RawSnapshot {
    status_counts: Vec<(String, i64)>,
    priority_counts: Vec<(String, i64)>,
    overdue: i64,
    project_count: i64,
    completions: Vec<DateTime<Utc>>,
}

async fn read_snapshot(
    conn: &mut AsyncPgConnection,
    ids: &[i64],
    now: DateTime<Utc>,
    since: DateTime<Utc>,
) -> Result<RawSnapshot, diesel::result::Error> {
    let status_counts = tasks::table
        .inner_join(projects::table)
        .filter(projects::workspace_id.eq_any(ids))
        .group_by(tasks::status)
        .select((tasks::status, count_star()))
        .load(conn)
        .await?;
    let priority_counts = tasks::table
        .inner_join(projects::table)
        .filter(projects::workspace_id.eq_any(ids))
        .group_by(tasks::priority)
        .select((tasks::priority, count_star()))
        .load(conn)
        .await?;
    let overdue = tasks::table
        .inner_join(projects::table)
        .filter(projects::workspace_id.eq_any(ids))
        .filter(tasks::due_date.lt(now))
        .filter(tasks::status.ne(TaskStatus::Done.as_str()))
        .select(count_star())
        .get_result(conn)
        .await?;
    let project_count = projects::table
        .filter(projects::workspace_id.eq_any(ids))
        .count()
        .get_result(conn)
        .await?;
    let completions = tasks::table
        .inner_join(projects::table)
        .filter(projects::workspace_id.eq_any(ids))
        .filter(tasks::status.eq(TaskStatus::Done.as_str()))
        .filter(tasks::updated_at.ge(since))
        .filter(tasks::updated_at.le(now))
        .select(tasks::updated_at)
        .load(conn)
        .await?;

    Ok(RawSnapshot {
        status_counts,
        priority_counts,
        overdue,
        project_count,
        completions,
    })
}

#[async_trait]
impl AnalyticsRepository for DieselAnalyticsRepository {
    async fn task_snapshot(
        &self,
        workspaces: &[WorkspaceId],
        now: DateTime<Utc>,
        since: DateTime<Utc>,
    ) -> Result<TaskSnapshot, AnalyticsRepositoryError> {
        let ids: Vec<i64> = workspaces.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let raw = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|conn| read_snapshot(conn, &ids, now, since).scope_boxed())
            .await
            .map_err(map_diesel_error)?;

        Ok(TaskSnapshot {
            status_counts: histogram(raw.status_counts),
            priority_counts: histogram(raw.priority_counts),
            overdue: count_to_u64(raw.overdue),
            project_count: count_to_u64(raw.project_count),
            completions: raw.completions,
        })
    }
}
