//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, `NotificationFeed`) are what inbound
//! adapters call. Driven ports (`*Repository`, `CredentialHasher`,
//! `TokenCodec`) are what domain services call and outbound adapters
//! implement.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod analytics_repository;
mod credential_hasher;
mod dashboard_query;
mod notification_feed;
mod notification_repository;
mod project_repository;
mod task_repository;
mod task_status_command;
mod token_codec;
mod user_repository;
mod workspace_command;
mod workspace_repository;

#[cfg(test)]
pub use account_command::{MockAccountCommand, MockAccountQuery};
pub use account_command::{AccountCommand, AccountQuery};
#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
pub use analytics_repository::{AnalyticsRepository, AnalyticsRepositoryError};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use dashboard_query::DashboardQuery;
#[cfg(test)]
pub use notification_feed::MockNotificationFeed;
pub use notification_feed::NotificationFeed;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{ProjectRepository, ProjectRepositoryError};
#[cfg(test)]
pub use task_repository::MockTaskRepository;
pub use task_repository::{TaskRepository, TaskRepositoryError};
#[cfg(test)]
pub use task_status_command::MockTaskStatusCommand;
pub use task_status_command::TaskStatusCommand;
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenCodecError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewAccount, StoredCredentials, UserRepository, UserRepositoryError};
#[cfg(test)]
pub use workspace_command::{MockWorkspaceCommand, MockWorkspaceQuery};
pub use workspace_command::{InviteOutcome, WorkspaceCommand, WorkspaceQuery};
#[cfg(test)]
pub use workspace_repository::MockWorkspaceRepository;
pub use workspace_repository::{WorkspaceRepository, WorkspaceRepositoryError};
