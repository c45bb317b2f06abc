//! Workspace domain service: workspace reads, administration and the
//! invite-and-notify workflow.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::authorization::map_workspace_error;
use crate::domain::ports::{
    InviteOutcome, NotificationRepository, ProjectRepository, ProjectRepositoryError,
    UserRepository, UserRepositoryError, WorkspaceCommand, WorkspaceQuery, WorkspaceRepository,
};
use crate::domain::{
    Capability, EmailAddress, Error, Member, NewNotification, NewWorkspace, NotificationKind,
    ProjectSummary, UserId, WorkspaceAccess, WorkspaceGuard, WorkspaceId, WorkspaceRole,
};

/// Confirmation message returned by a successful invitation.
pub const INVITE_SUCCESS_MESSAGE: &str = "Member invited successfully.";
/// Title of the notification sent to an invited user.
pub const INVITE_NOTIFICATION_TITLE: &str = "Workspace Invitation";

/// Workspace service implementing the workspace driving ports.
pub struct WorkspaceService<W, U, P, N> {
    workspaces: Arc<W>,
    users: Arc<U>,
    projects: Arc<P>,
    notifications: Arc<N>,
    guard: WorkspaceGuard<W>,
    clock: Arc<dyn Clock>,
}

impl<W, U, P, N> WorkspaceService<W, U, P, N>
where
    W: WorkspaceRepository,
{
    pub fn new(
        workspaces: Arc<W>,
        users: Arc<U>,
        projects: Arc<P>,
        notifications: Arc<N>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            guard: WorkspaceGuard::new(Arc::clone(&workspaces)),
            workspaces,
            users,
            projects,
            notifications,
            clock,
        }
    }
}

impl<W, U, P, N> WorkspaceService<W, U, P, N>
where
    W: WorkspaceRepository,
    U: UserRepository,
    P: ProjectRepository,
    N: NotificationRepository,
{
    fn map_user_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message }
            | UserRepositoryError::DuplicateEmail { email: message } => {
                Error::internal(format!("user repository error: {message}"))
            }
        }
    }

    fn map_project_error(error: ProjectRepositoryError) -> Error {
        match error {
            ProjectRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("project repository unavailable: {message}"))
            }
            ProjectRepositoryError::Query { message } => {
                Error::internal(format!("project repository error: {message}"))
            }
        }
    }

    fn user_not_found() -> Error {
        Error::not_found("user not found with this email").with_details(json!({
            "field": "email",
            "code": "user_not_found",
        }))
    }

    /// Parse the invitee email. Blank input is a malformed request; a
    /// malformed address cannot belong to anyone.
    fn invitee_email(raw: &str) -> Result<EmailAddress, Error> {
        if raw.trim().is_empty() {
            return Err(Error::invalid_request("email is required").with_details(json!({
                "field": "email",
                "code": "empty_email",
            })));
        }
        EmailAddress::new(raw).map_err(|_| Self::user_not_found())
    }

    async fn notify_invitee(&self, actor: UserId, access: &WorkspaceAccess, invitee: UserId) {
        let workspace = &access.workspace;
        let notification = NewNotification {
            user_id: invitee,
            kind: NotificationKind::WorkspaceInvite,
            title: INVITE_NOTIFICATION_TITLE.to_owned(),
            message: format!("You were added to {}.", workspace.name),
            meta: json!({
                "workspaceId": workspace.id,
                "workspaceName": workspace.name,
                "invitedBy": actor,
            }),
        };
        if let Err(error) = self
            .notifications
            .append(&notification, self.clock.utc())
            .await
        {
            warn!(
                %error,
                workspace_id = %workspace.id,
                user_id = %invitee,
                "invite notification not delivered"
            );
        }
    }
}

#[async_trait]
impl<W, U, P, N> WorkspaceQuery for WorkspaceService<W, U, P, N>
where
    W: WorkspaceRepository,
    U: UserRepository,
    P: ProjectRepository,
    N: NotificationRepository,
{
    async fn list_workspaces(&self, user: UserId) -> Result<Vec<WorkspaceAccess>, Error> {
        self.workspaces
            .list_for_member(user)
            .await
            .map_err(map_workspace_error)
    }

    async fn get_workspace(
        &self,
        user: UserId,
        workspace_id: WorkspaceId,
    ) -> Result<WorkspaceAccess, Error> {
        self.guard
            .require(user, workspace_id, Capability::View)
            .await
    }

    async fn list_members(
        &self,
        user: UserId,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Member>, Error> {
        self.guard
            .require(user, workspace_id, Capability::View)
            .await?;
        self.workspaces
            .list_members(workspace_id)
            .await
            .map_err(map_workspace_error)
    }

    async fn list_projects(
        &self,
        user: UserId,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<ProjectSummary>, Error> {
        self.guard
            .require(user, workspace_id, Capability::View)
            .await?;
        self.projects
            .list_with_counts(workspace_id)
            .await
            .map_err(Self::map_project_error)
    }
}

#[async_trait]
impl<W, U, P, N> WorkspaceCommand for WorkspaceService<W, U, P, N>
where
    W: WorkspaceRepository,
    U: UserRepository,
    P: ProjectRepository,
    N: NotificationRepository,
{
    async fn create_workspace(
        &self,
        user: UserId,
        workspace: &NewWorkspace,
    ) -> Result<WorkspaceAccess, Error> {
        let created = self
            .workspaces
            .create_workspace(user, workspace)
            .await
            .map_err(map_workspace_error)?;
        info!(workspace_id = %created.workspace.id, owner_id = %user, "workspace created");
        Ok(created)
    }

    async fn delete_workspace(&self, user: UserId, workspace_id: WorkspaceId) -> Result<(), Error> {
        self.guard
            .require(user, workspace_id, Capability::Manage)
            .await?;
        self.workspaces
            .delete_workspace(workspace_id)
            .await
            .map_err(map_workspace_error)?;
        info!(%workspace_id, user_id = %user, "workspace deleted");
        Ok(())
    }

    async fn invite_member(
        &self,
        user: UserId,
        workspace_id: WorkspaceId,
        email: &str,
    ) -> Result<InviteOutcome, Error> {
        let access = self
            .guard
            .require(user, workspace_id, Capability::Manage)
            .await?;
        let email = Self::invitee_email(email)?;
        let invitee = self
            .users
            .find_by_email(&email)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(Self::user_not_found)?;

        let member = self
            .workspaces
            .add_member(workspace_id, invitee.id, WorkspaceRole::Member)
            .await
            .map_err(map_workspace_error)?;
        info!(%workspace_id, invited_user_id = %invitee.id, "member invited");

        self.notify_invitee(user, &access, invitee.id).await;

        Ok(InviteOutcome {
            message: INVITE_SUCCESS_MESSAGE.to_owned(),
            member,
        })
    }
}

#[cfg(test)]
#[path = "workspace_service_tests.rs"]
mod tests;
