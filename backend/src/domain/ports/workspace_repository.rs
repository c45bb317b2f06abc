//! Port for the membership and role store.
//!
//! At most one membership row exists per `(workspace, user)` pair. Adapters
//! enforce this atomically; [`WorkspaceRepository::add_member`] reports a
//! lost race as [`WorkspaceRepositoryError::AlreadyMember`] instead of
//! writing a second row.

use async_trait::async_trait;

use crate::domain::{
    Member, NewWorkspace, UserId, WorkspaceAccess, WorkspaceId, WorkspaceRole,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by workspace repository adapters.
    pub enum WorkspaceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "workspace repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "workspace repository query failed: {message}",
        /// The user already belongs to the workspace.
        AlreadyMember { workspace_id: i64, user_id: i64 } =>
            "user {user_id} is already a member of workspace {workspace_id}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Create a workspace and its owner membership in one transaction.
    async fn create_workspace(
        &self,
        owner: UserId,
        workspace: &NewWorkspace,
    ) -> Result<WorkspaceAccess, WorkspaceRepositoryError>;

    /// The workspace and `user`'s role in it, or `None` without a membership.
    async fn find_access(
        &self,
        workspace_id: WorkspaceId,
        user: UserId,
    ) -> Result<Option<WorkspaceAccess>, WorkspaceRepositoryError>;

    /// Every workspace `user` belongs to, newest first.
    async fn list_for_member(
        &self,
        user: UserId,
    ) -> Result<Vec<WorkspaceAccess>, WorkspaceRepositoryError>;

    /// Distinct ids of workspaces `user` owns or belongs to.
    async fn visible_workspace_ids(
        &self,
        user: UserId,
    ) -> Result<Vec<WorkspaceId>, WorkspaceRepositoryError>;

    /// Members ordered by join time ascending.
    async fn list_members(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Member>, WorkspaceRepositoryError>;

    /// Insert a membership unless one already exists for the pair.
    async fn add_member(
        &self,
        workspace_id: WorkspaceId,
        user: UserId,
        role: WorkspaceRole,
    ) -> Result<Member, WorkspaceRepositoryError>;

    /// Remove the workspace with its memberships, projects and tasks.
    async fn delete_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<(), WorkspaceRepositoryError>;
}
