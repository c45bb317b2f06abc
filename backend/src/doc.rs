//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api/v1` path and the health probes. The
//! document backs Swagger UI in debug builds and is printed by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::InviteOutcome;
use crate::domain::{
    AuthSession, DashboardStats, Error, ErrorCode, Member, Notification, ProjectSummary, Task,
    User, WorkspaceAccess,
};
use crate::inbound::http::accounts::{LoginRequest, RegisterRequest};
use crate::inbound::http::health::ProbeReport;
use crate::inbound::http::notifications::{MarkReadResponse, UnreadCountResponse};
use crate::inbound::http::tasks::UpdateStatusRequest;
use crate::inbound::http::workspaces::{CreateWorkspaceRequest, InviteRequest};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerToken";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Session token issued by POST /api/v1/auth/register or /api/v1/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Task Nexus API",
        description = "Multi-tenant workspaces, invitations, notifications and task analytics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::workspaces::list_workspaces,
        crate::inbound::http::workspaces::create_workspace,
        crate::inbound::http::workspaces::get_workspace,
        crate::inbound::http::workspaces::delete_workspace,
        crate::inbound::http::workspaces::list_members,
        crate::inbound::http::workspaces::invite_member,
        crate::inbound::http::workspaces::list_projects,
        crate::inbound::http::tasks::update_task_status,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::unread_count,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::analytics::dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        AuthSession,
        WorkspaceAccess,
        Member,
        InviteOutcome,
        ProjectSummary,
        Task,
        Notification,
        DashboardStats,
        RegisterRequest,
        LoginRequest,
        CreateWorkspaceRequest,
        InviteRequest,
        UpdateStatusRequest,
        UnreadCountResponse,
        MarkReadResponse,
        ProbeReport,
    )),
    tags(
        (name = "auth", description = "Registration, login and token identity"),
        (name = "workspaces", description = "Workspaces, members and invitations"),
        (name = "tasks", description = "Task workflow"),
        (name = "notifications", description = "Polling notification feed"),
        (name = "analytics", description = "Dashboard statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("User", "createdAt")]
    #[case("DashboardStats", "weeklyCompletion")]
    #[case("Notification", "type")]
    fn schemas_use_wire_field_names(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");

        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    #[case("/api/v1/auth/register")]
    #[case("/api/v1/workspaces/{id}/invite")]
    #[case("/api/v1/notifications/unread-count")]
    #[case("/api/v1/analytics/dashboard")]
    fn paths_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }
}
