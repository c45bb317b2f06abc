//! Port for reading projects with their derived task counts.

use async_trait::async_trait;

use crate::domain::{ProjectSummary, WorkspaceId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by project repository adapters.
    pub enum ProjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "project repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "project repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Projects in the workspace, newest first, with task and completed counts.
    async fn list_with_counts(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<ProjectSummary>, ProjectRepositoryError>;
}
