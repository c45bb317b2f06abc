//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities for identity, workspaces,
//! projects, tasks, notifications and analytics, plus the services that
//! implement the driving ports over the driven repositories. Types stay
//! transport agnostic; invariants and serde contracts live in each type's
//! Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - Identity: `User`, `Username`, `EmailAddress`, `Registration`,
//!   `LoginCredentials`, `SessionClaims`, `AuthSession`.
//! - Tenancy: `Workspace`, `WorkspaceRole`, `Capability`, `WorkspaceGuard`.
//! - Services: `AccountService`, `WorkspaceService`, `NotificationService`,
//!   `DashboardService`, `TaskStatusService`.

pub mod account_service;
pub mod analytics;
pub mod auth;
pub mod authorization;
pub mod dashboard_service;
pub mod error;
pub mod ids;
pub mod notification;
pub mod notification_service;
pub mod ports;
pub mod project;
pub mod task;
pub mod task_service;
pub mod trace_id;
pub mod user;
pub mod workspace;
pub mod workspace_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::account_service::{AccountService, INVALID_CREDENTIALS, INVALID_TOKEN};
pub use self::analytics::{
    normalize_status_label, weekly_window_start, DashboardStats, PriorityCount, StatusCount,
    TaskSnapshot, WeeklyCompletion, WEEKLY_WINDOW_WEEKS,
};
pub use self::auth::{
    AuthSession, CredentialValidationError, LoginCredentials, Registration, SessionClaims,
    PASSWORD_MIN, SESSION_TTL_DAYS,
};
pub use self::authorization::{authorize, WorkspaceGuard, ACCESS_DENIED};
pub use self::dashboard_service::DashboardService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{NotificationId, ProjectId, TaskId, UserId, WorkspaceId};
pub use self::notification::{NewNotification, Notification, NotificationKind};
pub use self::notification_service::NotificationService;
pub use self::project::{NewProject, ProjectSummary, DEFAULT_PROJECT_COLOR};
pub use self::task::{Task, TaskPriority, TaskStatus, UnknownStatus};
pub use self::task_service::TaskStatusService;
pub use self::trace_id::{TraceId, TRACE_ID_HEADER};
pub use self::user::{
    EmailAddress, User, UserValidationError, Username, EMAIL_MAX, USERNAME_MAX, USERNAME_MIN,
};
pub use self::workspace::{
    Capability, Member, NewWorkspace, UnknownRole, Workspace, WorkspaceAccess, WorkspaceRole,
    WorkspaceValidationError, WORKSPACE_NAME_MAX,
};
pub use self::workspace_service::{
    WorkspaceService, INVITE_NOTIFICATION_TITLE, INVITE_SUCCESS_MESSAGE,
};

