//! Notification feed handlers.
//!
//! ```text
//! GET /api/v1/notifications
//! GET /api/v1/notifications/unread-count
//! PUT /api/v1/notifications/{id}/read
//! ```
//!
//! The feed is served for polling. Responses are never cached and carry an
//! `X-Poll-Interval` hint in seconds.

use actix_web::{HttpResponse, HttpResponseBuilder, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Notification, NotificationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Header advertising how often clients should poll the feed.
pub const POLL_INTERVAL_HEADER: &str = "X-Poll-Interval";

/// Suggested polling period, in seconds.
pub const POLL_INTERVAL_SECS: u32 = 5;

/// Response body for `GET /api/v1/notifications/unread-count`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    #[schema(example = 3)]
    pub unread: u64,
}

/// Response body for `PUT /api/v1/notifications/{id}/read`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub success: bool,
}

fn feed_response() -> HttpResponseBuilder {
    let mut builder = HttpResponse::Ok();
    builder
        .insert_header(("Cache-Control", "no-store"))
        .insert_header((POLL_INTERVAL_HEADER, POLL_INTERVAL_SECS.to_string()));
    builder
}

/// The caller's notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (
            status = 200,
            description = "Notifications",
            headers(
                ("Cache-Control" = String, description = "Always no-store"),
                ("X-Poll-Interval" = u32, description = "Suggested polling period in seconds")
            ),
            body = [Notification]
        ),
        (status = 401, description = "Invalid token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let entries = state.notifications.list(user.id()).await?;
    Ok(feed_response().json(entries))
}

/// Number of unread notifications.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse),
        (status = 401, description = "Invalid token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "unreadCount"
)]
#[get("/notifications/unread-count")]
pub async fn unread_count(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let unread = state.notifications.unread_count(user.id()).await?;
    Ok(feed_response().json(UnreadCountResponse { unread }))
}

/// Mark one notification read.
///
/// Ids belonging to other users are accepted and ignored, so the response
/// does not reveal whether the id exists.
#[utoipa::path(
    put,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = i64, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Acknowledged", body = MarkReadResponse),
        (status = 401, description = "Invalid token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[put("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MarkReadResponse>> {
    state
        .notifications
        .mark_read(user.id(), NotificationId::new(path.into_inner()))
        .await?;
    Ok(web::Json(MarkReadResponse { success: true }))
}
