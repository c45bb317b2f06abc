//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AccountCommand, AccountQuery, AnalyticsRepository, CredentialHasher, DashboardQuery,
    NotificationFeed, NotificationRepository, ProjectRepository, TaskRepository,
    TaskStatusCommand, TokenCodec, UserRepository, WorkspaceCommand, WorkspaceQuery,
    WorkspaceRepository,
};
use crate::domain::{
    AccountService, DashboardService, NotificationService, TaskStatusService, WorkspaceService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub sessions: Arc<dyn AccountQuery>,
    pub workspaces: Arc<dyn WorkspaceCommand>,
    pub workspaces_query: Arc<dyn WorkspaceQuery>,
    pub notifications: Arc<dyn NotificationFeed>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub tasks: Arc<dyn TaskStatusCommand>,
}

/// Driven adapters the domain services are built from.
///
/// Each field is generic so the Diesel repositories and the in-memory store
/// wire up through the same path.
pub struct HttpStateDependencies<U, W, P, T, N, A, H> {
    pub users: Arc<U>,
    pub workspaces: Arc<W>,
    pub projects: Arc<P>,
    pub tasks: Arc<T>,
    pub notifications: Arc<N>,
    pub analytics: Arc<A>,
    pub hasher: Arc<H>,
    pub tokens: Arc<dyn TokenCodec>,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Build the domain services over `deps` and expose them as ports.
    pub fn from_dependencies<U, W, P, T, N, A, H>(
        deps: HttpStateDependencies<U, W, P, T, N, A, H>,
    ) -> Self
    where
        U: UserRepository + 'static,
        W: WorkspaceRepository + 'static,
        P: ProjectRepository + 'static,
        T: TaskRepository + 'static,
        N: NotificationRepository + 'static,
        A: AnalyticsRepository + 'static,
        H: CredentialHasher + 'static,
    {
        let HttpStateDependencies {
            users,
            workspaces,
            projects,
            tasks,
            notifications,
            analytics,
            hasher,
            tokens,
            clock,
        } = deps;

        let accounts = Arc::new(AccountService::new(
            Arc::clone(&users),
            hasher,
            tokens,
            Arc::clone(&clock),
        ));
        let workspace_service = Arc::new(WorkspaceService::new(
            Arc::clone(&workspaces),
            users,
            projects,
            Arc::clone(&notifications),
            Arc::clone(&clock),
        ));

        Self {
            accounts: accounts.clone(),
            sessions: accounts,
            workspaces: workspace_service.clone(),
            workspaces_query: workspace_service,
            notifications: Arc::new(NotificationService::new(notifications)),
            dashboard: Arc::new(DashboardService::new(
                Arc::clone(&workspaces),
                analytics,
                Arc::clone(&clock),
            )),
            tasks: Arc::new(TaskStatusService::new(tasks, workspaces, clock)),
        }
    }
}
