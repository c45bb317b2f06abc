//! Authorization guard for workspace-scoped operations.
//!
//! A caller without a membership row, a caller whose role lacks the
//! capability, and a caller naming a workspace that does not exist all get
//! the same [`ErrorCode::Forbidden`](crate::domain::ErrorCode::Forbidden)
//! error. Clients cannot probe which workspaces exist.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::ports::{WorkspaceRepository, WorkspaceRepositoryError};
use crate::domain::{Capability, Error, UserId, WorkspaceAccess, WorkspaceId};

/// Message shared by every workspace denial.
pub const ACCESS_DENIED: &str = "workspace access denied";

/// Resolve a membership lookup into access or the uniform denial.
///
/// # Examples
/// ```
/// use nexus::domain::{authorize, Capability, ErrorCode};
///
/// let err = authorize(None, Capability::View).unwrap_err();
/// assert_eq!(err.code(), ErrorCode::Forbidden);
/// ```
pub fn authorize(
    access: Option<WorkspaceAccess>,
    capability: Capability,
) -> Result<WorkspaceAccess, Error> {
    match access {
        Some(access) if access.role.grants(capability) => Ok(access),
        _ => Err(Error::forbidden(ACCESS_DENIED)),
    }
}

/// Map membership store failures onto domain errors.
pub(crate) fn map_workspace_error(error: WorkspaceRepositoryError) -> Error {
    match error {
        WorkspaceRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("workspace repository unavailable: {message}"))
        }
        WorkspaceRepositoryError::Query { message } => {
            Error::internal(format!("workspace repository error: {message}"))
        }
        WorkspaceRepositoryError::AlreadyMember {
            workspace_id,
            user_id,
        } => Error::conflict("user is already a member of this workspace").with_details(json!({
            "workspaceId": workspace_id,
            "userId": user_id,
            "code": "already_member",
        })),
    }
}

/// Checks capabilities against the membership store.
pub struct WorkspaceGuard<W> {
    workspaces: Arc<W>,
}

impl<W> Clone for WorkspaceGuard<W> {
    fn clone(&self) -> Self {
        Self {
            workspaces: Arc::clone(&self.workspaces),
        }
    }
}

impl<W> WorkspaceGuard<W>
where
    W: WorkspaceRepository,
{
    pub fn new(workspaces: Arc<W>) -> Self {
        Self { workspaces }
    }

    /// Require `capability` for `user` on `workspace_id`.
    ///
    /// # Errors
    /// [`ErrorCode::Forbidden`](crate::domain::ErrorCode::Forbidden) on any
    /// denial; store failures map through the usual repository mapping.
    pub async fn require(
        &self,
        user: UserId,
        workspace_id: WorkspaceId,
        capability: Capability,
    ) -> Result<WorkspaceAccess, Error> {
        let access = self
            .workspaces
            .find_access(workspace_id, user)
            .await
            .map_err(map_workspace_error)?;
        authorize(access, capability).inspect_err(|_| {
            debug!(
                user_id = %user,
                workspace_id = %workspace_id,
                ?capability,
                "workspace capability denied"
            );
        })
    }
}
