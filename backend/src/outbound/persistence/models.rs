//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer. Conversion into domain
//! types re-validates stored values, so a corrupted row surfaces as a query
//! error rather than an invalid domain value.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    EmailAddress, Member, Notification, NotificationId, ProjectId, Task, TaskId, TaskStatus, User,
    UserId, Username, Workspace, WorkspaceId, WorkspaceRole,
};

use super::schema::{notifications, projects, tasks, users, workspace_members, workspaces};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, String> {
        Ok(User {
            id: UserId::new(self.id),
            username: Username::new(&self.username).map_err(|err| err.to_string())?,
            email: EmailAddress::new(&self.email).map_err(|err| err.to_string())?,
            created_at: self.created_at,
        })
    }
}

/// A user row plus the stored password hash, read only by login.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password_hash: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workspaces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WorkspaceRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<WorkspaceRow> for Workspace {
    fn from(row: WorkspaceRow) -> Self {
        Self {
            id: WorkspaceId::new(row.id),
            name: row.name,
            description: row.description,
            owner_id: UserId::new(row.owner_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = workspaces)]
pub(crate) struct NewWorkspaceRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub owner_id: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = workspace_members)]
pub(crate) struct NewMemberRow<'a> {
    pub workspace_id: i64,
    pub user_id: i64,
    pub role: &'a str,
}

/// Membership joined with the member's profile.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct MemberRow {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl MemberRow {
    pub(crate) fn into_member(self) -> Result<Member, String> {
        Ok(Member {
            user_id: UserId::new(self.user_id),
            username: Username::new(&self.username).map_err(|err| err.to_string())?,
            email: EmailAddress::new(&self.email).map_err(|err| err.to_string())?,
            role: parse_role(&self.role)?,
            joined_at: self.joined_at,
        })
    }
}

pub(crate) fn parse_role(raw: &str) -> Result<WorkspaceRole, String> {
    raw.parse::<WorkspaceRole>().map_err(|err| err.to_string())
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProjectRow {
    pub id: i64,
    pub workspace_id: i64,
    pub name: String,
    pub description: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = projects)]
pub(crate) struct NewProjectRow<'a> {
    pub workspace_id: i64,
    pub name: &'a str,
    pub description: &'a str,
    pub color: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskRow {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskRow {
    pub(crate) fn into_task(self) -> Result<Task, String> {
        let status = self
            .status
            .parse::<TaskStatus>()
            .map_err(|err| err.to_string())?;
        Ok(Task {
            id: TaskId::new(self.id),
            project_id: ProjectId::new(self.project_id),
            title: self.title,
            description: self.description,
            status,
            priority: self.priority,
            due_date: self.due_date,
            completed: self.completed,
            created_by: self.created_by.map(UserId::new),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub meta: serde_json::Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: NotificationId::new(row.id),
            user_id: UserId::new(row.user_id),
            kind: row.kind,
            title: row.title,
            message: row.message,
            meta: row.meta,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub user_id: i64,
    pub kind: &'a str,
    pub title: &'a str,
    pub message: &'a str,
    pub meta: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
}
