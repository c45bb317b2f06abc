//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::{App, web};

use crate::domain::ports::{
    MockAccountCommand, MockAccountQuery, MockDashboardQuery, MockNotificationFeed,
    MockTaskStatusCommand, MockWorkspaceCommand, MockWorkspaceQuery,
};
use crate::domain::{SessionClaims, UserId};
use crate::inbound::http::api_scope;
use crate::inbound::http::state::HttpState;

/// Port mocks handed to the configuration closure of [`mocked_state`].
#[derive(Default)]
pub struct PortMocks {
    pub accounts: MockAccountCommand,
    pub sessions: MockAccountQuery,
    pub workspaces: MockWorkspaceCommand,
    pub workspaces_query: MockWorkspaceQuery,
    pub notifications: MockNotificationFeed,
    pub dashboard: MockDashboardQuery,
    pub tasks: MockTaskStatusCommand,
}

impl PortMocks {
    /// Accept any bearer token as belonging to `user`.
    pub fn signed_in_as(&mut self, user: i64) {
        self.sessions.expect_verify_token().returning(move |_| {
            Ok(SessionClaims {
                user_id: UserId::new(user),
                username: format!("user{user}"),
                email: format!("user{user}@example.com"),
                issued_at: 0,
                expires_at: i64::MAX,
            })
        });
    }
}

/// Build an [`HttpState`] whose ports are mocks configured by `configure`.
pub fn mocked_state(configure: impl FnOnce(&mut PortMocks)) -> HttpState {
    let mut mocks = PortMocks::default();
    configure(&mut mocks);
    HttpState {
        accounts: Arc::new(mocks.accounts),
        sessions: Arc::new(mocks.sessions),
        workspaces: Arc::new(mocks.workspaces),
        workspaces_query: Arc::new(mocks.workspaces_query),
        notifications: Arc::new(mocks.notifications),
        dashboard: Arc::new(mocks.dashboard),
        tasks: Arc::new(mocks.tasks),
    }
}

/// `Authorization` header carrying `token`.
pub fn bearer(token: &str) -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Application serving the full `/api/v1` scope over `state`.
pub fn api_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(api_scope())
}
