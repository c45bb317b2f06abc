//! Driving ports for workspace-scoped reads and administration.
//!
//! Every operation takes the acting user and is gated by the authorization
//! guard before any other row is touched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, Member, NewWorkspace, ProjectSummary, UserId, WorkspaceAccess, WorkspaceId,
};

/// Confirmation returned after a successful invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteOutcome {
    #[schema(example = "Member invited successfully.")]
    pub message: String,
    pub member: Member,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkspaceQuery: Send + Sync {
    /// Workspaces the user belongs to, newest first, with their role.
    async fn list_workspaces(&self, user: UserId) -> Result<Vec<WorkspaceAccess>, Error>;

    /// One workspace with the caller's role. Requires view access.
    async fn get_workspace(
        &self,
        user: UserId,
        workspace_id: WorkspaceId,
    ) -> Result<WorkspaceAccess, Error>;

    /// Members ordered by join time. Requires view access.
    async fn list_members(
        &self,
        user: UserId,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Member>, Error>;

    /// Projects with derived task counts. Requires view access.
    async fn list_projects(
        &self,
        user: UserId,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<ProjectSummary>, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkspaceCommand: Send + Sync {
    /// Create a workspace owned by `user`.
    async fn create_workspace(
        &self,
        user: UserId,
        workspace: &NewWorkspace,
    ) -> Result<WorkspaceAccess, Error>;

    /// Delete a workspace and everything in it. Requires manage access.
    async fn delete_workspace(&self, user: UserId, workspace_id: WorkspaceId) -> Result<(), Error>;

    /// Add the user registered under `email` as a member and notify them.
    /// Requires manage access.
    async fn invite_member(
        &self,
        user: UserId,
        workspace_id: WorkspaceId,
        email: &str,
    ) -> Result<InviteOutcome, Error>;
}
