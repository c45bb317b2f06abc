//! PostgreSQL-backed `WorkspaceRepository`.
//!
//! Membership uniqueness rests on the `(workspace_id, user_id)` primary key:
//! `add_member` inserts with `ON CONFLICT DO NOTHING` and treats zero
//! affected rows as an existing membership.

use std::collections::BTreeSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{WorkspaceRepository, WorkspaceRepositoryError};
use crate::domain::{Member, NewWorkspace, UserId, WorkspaceAccess, WorkspaceId, WorkspaceRole};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{parse_role, MemberRow, NewMemberRow, NewWorkspaceRow, WorkspaceRow};
use super::pool::{DbPool, PoolError};
use super::schema::{projects, tasks, users, workspace_members, workspaces};

/// Diesel-backed implementation of the membership and role store.
#[derive(Clone)]
pub struct DieselWorkspaceRepository {
    pool: DbPool,
}

impl DieselWorkspaceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> WorkspaceRepositoryError {
    map_basic_pool_error(error, WorkspaceRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> WorkspaceRepositoryError {
    map_basic_diesel_error(
        error,
        WorkspaceRepositoryError::query,
        WorkspaceRepositoryError::connection,
    )
}

fn row_to_access(
    (workspace, role): (WorkspaceRow, String),
) -> Result<WorkspaceAccess, WorkspaceRepositoryError> {
    Ok(WorkspaceAccess {
        workspace: workspace.into(),
        role: parse_role(&role).map_err(WorkspaceRepositoryError::query)?,
    })
}

fn row_to_member(row: MemberRow) -> Result<Member, WorkspaceRepositoryError> {
    row.into_member().map_err(WorkspaceRepositoryError::query)
}

type MemberColumns = (
    users::id,
    users::username,
    users::email,
    workspace_members::role,
    workspace_members::joined_at,
);

const MEMBER_COLUMNS: MemberColumns = (
    users::id,
    users::username,
    users::email,
    workspace_members::role,
    workspace_members::joined_at,
);

#[async_trait]
impl WorkspaceRepository for DieselWorkspaceRepository {
    async fn create_workspace(
        &self,
        owner: UserId,
        workspace: &NewWorkspace,
    ) -> Result<WorkspaceAccess, WorkspaceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewWorkspaceRow {
            name: workspace.name(),
            description: workspace.description(),
            owner_id: owner.get(),
        };

        let row = conn
            .transaction(|conn| {
                async move {
                    let row: WorkspaceRow = diesel::insert_into(workspaces::table)
                        .values(&new_row)
                        .returning(WorkspaceRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(workspace_members::table)
                        .values(&NewMemberRow {
                            workspace_id: row.id,
                            user_id: owner.get(),
                            role: WorkspaceRole::Owner.as_str(),
                        })
                        .execute(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(WorkspaceAccess {
            workspace: row.into(),
            role: WorkspaceRole::Owner,
        })
    }

    async fn find_access(
        &self,
        workspace_id: WorkspaceId,
        user: UserId,
    ) -> Result<Option<WorkspaceAccess>, WorkspaceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = workspaces::table
            .inner_join(workspace_members::table)
            .filter(workspaces::id.eq(workspace_id.get()))
            .filter(workspace_members::user_id.eq(user.get()))
            .select((WorkspaceRow::as_select(), workspace_members::role))
            .first::<(WorkspaceRow, String)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_access).transpose()
    }

    async fn list_for_member(
        &self,
        user: UserId,
    ) -> Result<Vec<WorkspaceAccess>, WorkspaceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(WorkspaceRow, String)> = workspaces::table
            .inner_join(workspace_members::table)
            .filter(workspace_members::user_id.eq(user.get()))
            .order((workspaces::created_at.desc(), workspaces::id.desc()))
            .select((WorkspaceRow::as_select(), workspace_members::role))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_access).collect()
    }

    async fn visible_workspace_ids(
        &self,
        user: UserId,
    ) -> Result<Vec<WorkspaceId>, WorkspaceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let member_of: Vec<i64> = workspace_members::table
            .filter(workspace_members::user_id.eq(user.get()))
            .select(workspace_members::workspace_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let owned: Vec<i64> = workspaces::table
            .filter(workspaces::owner_id.eq(user.get()))
            .select(workspaces::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids: BTreeSet<i64> = member_of.into_iter().chain(owned).collect();
        Ok(ids.into_iter().map(WorkspaceId::new).collect())
    }

    async fn list_members(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Member>, WorkspaceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MemberRow> = workspace_members::table
            .inner_join(users::table)
            .filter(workspace_members::workspace_id.eq(workspace_id.get()))
            .order((workspace_members::joined_at.asc(), users::id.asc()))
            .select(MEMBER_COLUMNS)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_member).collect()
    }

    async fn add_member(
        &self,
        workspace_id: WorkspaceId,
        user: UserId,
        role: WorkspaceRole,
    ) -> Result<Member, WorkspaceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewMemberRow {
            workspace_id: workspace_id.get(),
            user_id: user.get(),
            role: role.as_str(),
        };

        let inserted = conn
            .transaction(|conn| {
                async move {
                    let affected = diesel::insert_into(workspace_members::table)
                        .values(&new_row)
                        .on_conflict((workspace_members::workspace_id, workspace_members::user_id))
                        .do_nothing()
                        .execute(conn)
                        .await?;
                    if affected == 0 {
                        return Ok(None);
                    }
                    let row: MemberRow = workspace_members::table
                        .inner_join(users::table)
                        .filter(workspace_members::workspace_id.eq(new_row.workspace_id))
                        .filter(workspace_members::user_id.eq(new_row.user_id))
                        .select(MEMBER_COLUMNS)
                        .first(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(Some(row))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match inserted {
            Some(row) => row_to_member(row),
            None => {
                debug!(%workspace_id, user_id = %user, "membership already present");
                Err(WorkspaceRepositoryError::already_member(
                    workspace_id.get(),
                    user.get(),
                ))
            }
        }
    }

    async fn delete_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<(), WorkspaceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = workspace_id.get();

        conn.transaction(|conn| {
            async move {
                let project_ids = projects::table
                    .filter(projects::workspace_id.eq(id))
                    .select(projects::id);
                diesel::delete(tasks::table.filter(tasks::project_id.eq_any(project_ids)))
                    .execute(conn)
                    .await?;
                diesel::delete(projects::table.filter(projects::workspace_id.eq(id)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    workspace_members::table.filter(workspace_members::workspace_id.eq(id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(workspaces::table.find(id))
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
