//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod analytics;
pub mod auth;
pub mod error;
pub mod health;
pub mod notifications;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod validation;
pub mod workspaces;

use actix_web::{Scope, web};

pub use error::{ApiResult, json_config};

/// Every `/api/v1` endpoint, with JSON errors for unreadable bodies.
///
/// The caller registers a `web::Data<HttpState>` on the surrounding app.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(json_config())
        .service(accounts::register)
        .service(accounts::login)
        .service(accounts::current_user)
        .service(workspaces::list_workspaces)
        .service(workspaces::create_workspace)
        .service(workspaces::get_workspace)
        .service(workspaces::delete_workspace)
        .service(workspaces::list_members)
        .service(workspaces::invite_member)
        .service(workspaces::list_projects)
        .service(tasks::update_task_status)
        .service(notifications::list_notifications)
        .service(notifications::unread_count)
        .service(notifications::mark_read)
        .service(analytics::dashboard)
}
