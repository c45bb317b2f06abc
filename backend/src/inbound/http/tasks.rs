//! Task workflow handlers.
//!
//! ```text
//! PUT /api/v1/tasks/{id}/status {"status":"done"}
//! ```

use actix_web::{put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Task, TaskId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_status;

/// Request body for `PUT /api/v1/tasks/{id}/status`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    #[schema(example = "in_progress")]
    pub status: Option<String>,
}

/// Move a task to another workflow status.
///
/// Any member of the task's workspace may do this. Unknown task ids are
/// reported exactly like tasks in a foreign workspace.
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}/status",
    params(("id" = i64, Path, description = "Task id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated task", body = Task),
        (status = 400, description = "Unknown status", body = Error),
        (status = 401, description = "Invalid token", body = Error),
        (status = 403, description = "No access to the task", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "updateTaskStatus"
)]
#[put("/tasks/{id}/status")]
pub async fn update_task_status(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<web::Json<Task>> {
    let status = parse_status(payload.into_inner().status)?;
    let task = state
        .tasks
        .update_status(user.id(), TaskId::new(path.into_inner()), status)
        .await?;
    Ok(web::Json(task))
}
