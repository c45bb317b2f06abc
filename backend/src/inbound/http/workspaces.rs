//! Workspace API handlers.
//!
//! ```text
//! GET    /api/v1/workspaces
//! POST   /api/v1/workspaces {"name":"Research","description":"Lab work"}
//! GET    /api/v1/workspaces/{id}
//! DELETE /api/v1/workspaces/{id}
//! GET    /api/v1/workspaces/{id}/members
//! POST   /api/v1/workspaces/{id}/invite {"email":"grace@example.com"}
//! GET    /api/v1/workspaces/{id}/projects
//! ```
//!
//! Access checks live in the domain services; handlers only translate
//! payloads and paths.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::InviteOutcome;
use crate::domain::{Error, Member, NewWorkspace, ProjectSummary, WorkspaceAccess, WorkspaceId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, workspace_error};

/// Request body for `POST /api/v1/workspaces`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateWorkspaceRequest {
    #[schema(example = "Research")]
    pub name: String,
    #[schema(example = "Lab work")]
    pub description: Option<String>,
}

/// Request body for `POST /api/v1/workspaces/{id}/invite`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    #[schema(example = "grace@example.com")]
    pub email: Option<String>,
}

/// Workspaces the caller belongs to, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/workspaces",
    responses(
        (status = 200, description = "Workspaces with the caller's role", body = [WorkspaceAccess]),
        (status = 401, description = "Invalid token", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["workspaces"],
    operation_id = "listWorkspaces"
)]
#[get("/workspaces")]
pub async fn list_workspaces(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<WorkspaceAccess>>> {
    let workspaces = state.workspaces_query.list_workspaces(user.id()).await?;
    Ok(web::Json(workspaces))
}

/// Create a workspace owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/workspaces",
    request_body = CreateWorkspaceRequest,
    responses(
        (status = 201, description = "Workspace created", body = WorkspaceAccess),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid token", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["workspaces"],
    operation_id = "createWorkspace"
)]
#[post("/workspaces")]
pub async fn create_workspace(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateWorkspaceRequest>,
) -> ApiResult<HttpResponse> {
    let CreateWorkspaceRequest { name, description } = payload.into_inner();
    let workspace =
        NewWorkspace::try_from_parts(&name, description.as_deref()).map_err(workspace_error)?;
    let created = state
        .workspaces
        .create_workspace(user.id(), &workspace)
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// One workspace with the caller's role.
#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}",
    params(("id" = i64, Path, description = "Workspace id")),
    responses(
        (status = 200, description = "Workspace", body = WorkspaceAccess),
        (status = 401, description = "Invalid token", body = Error),
        (status = 403, description = "Not a member", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["workspaces"],
    operation_id = "getWorkspace"
)]
#[get("/workspaces/{id}")]
pub async fn get_workspace(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<WorkspaceAccess>> {
    let workspace = state
        .workspaces_query
        .get_workspace(user.id(), WorkspaceId::new(path.into_inner()))
        .await?;
    Ok(web::Json(workspace))
}

/// Delete a workspace with its projects, tasks and memberships.
#[utoipa::path(
    delete,
    path = "/api/v1/workspaces/{id}",
    params(("id" = i64, Path, description = "Workspace id")),
    responses(
        (status = 204, description = "Workspace deleted"),
        (status = 401, description = "Invalid token", body = Error),
        (status = 403, description = "Owner or admin role required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["workspaces"],
    operation_id = "deleteWorkspace"
)]
#[delete("/workspaces/{id}")]
pub async fn delete_workspace(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .workspaces
        .delete_workspace(user.id(), WorkspaceId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Members of a workspace in join order.
#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}/members",
    params(("id" = i64, Path, description = "Workspace id")),
    responses(
        (status = 200, description = "Members", body = [Member]),
        (status = 401, description = "Invalid token", body = Error),
        (status = 403, description = "Not a member", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["workspaces"],
    operation_id = "listMembers"
)]
#[get("/workspaces/{id}/members")]
pub async fn list_members(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<Member>>> {
    let members = state
        .workspaces_query
        .list_members(user.id(), WorkspaceId::new(path.into_inner()))
        .await?;
    Ok(web::Json(members))
}

/// Add a registered user to the workspace and notify them.
#[utoipa::path(
    post,
    path = "/api/v1/workspaces/{id}/invite",
    params(("id" = i64, Path, description = "Workspace id")),
    request_body = InviteRequest,
    responses(
        (status = 200, description = "Member added", body = InviteOutcome),
        (status = 400, description = "Email missing", body = Error),
        (status = 401, description = "Invalid token", body = Error),
        (status = 403, description = "Owner or admin role required", body = Error),
        (status = 404, description = "No user with this email", body = Error),
        (status = 409, description = "Already a member", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["workspaces"],
    operation_id = "invite"
)]
#[post("/workspaces/{id}/invite")]
pub async fn invite_member(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<InviteRequest>,
) -> ApiResult<web::Json<InviteOutcome>> {
    let email = payload
        .into_inner()
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| missing_field_error("email"))?;
    let outcome = state
        .workspaces
        .invite_member(user.id(), WorkspaceId::new(path.into_inner()), &email)
        .await?;
    Ok(web::Json(outcome))
}

/// Projects in a workspace with task counts.
#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}/projects",
    params(("id" = i64, Path, description = "Workspace id")),
    responses(
        (status = 200, description = "Projects", body = [ProjectSummary]),
        (status = 401, description = "Invalid token", body = Error),
        (status = 403, description = "Not a member", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["workspaces"],
    operation_id = "listProjects"
)]
#[get("/workspaces/{id}/projects")]
pub async fn list_projects(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<ProjectSummary>>> {
    let projects = state
        .workspaces_query
        .list_projects(user.id(), WorkspaceId::new(path.into_inner()))
        .await?;
    Ok(web::Json(projects))
}
