//! Projects group tasks inside a workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ProjectId, WorkspaceId};

/// Colour assigned to projects created without one.
pub const DEFAULT_PROJECT_COLOR: &str = "#3B82F6";

/// Project listing entry with task counts derived at read time.
///
/// ## Invariants
/// - `completed_count <= task_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub description: String,
    #[schema(example = "#3B82F6")]
    pub color: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    pub task_count: u64,
    pub completed_count: u64,
}

/// Input for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub color: String,
}

impl NewProject {
    /// First project seeded into a freshly registered user's workspace.
    pub fn starter() -> Self {
        Self {
            name: "My First Project".to_owned(),
            description: "Default project".to_owned(),
            color: DEFAULT_PROJECT_COLOR.to_owned(),
        }
    }
}
