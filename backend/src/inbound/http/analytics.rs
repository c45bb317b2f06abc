//! Analytics handler.
//!
//! ```text
//! GET /api/v1/analytics/dashboard
//! ```

use actix_web::{HttpResponse, get, web};

use crate::domain::{DashboardStats, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Dashboard statistics over every workspace the caller can see.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/dashboard",
    responses(
        (
            status = 200,
            description = "Dashboard statistics",
            headers(("Cache-Control" = String, description = "Private, revalidated")),
            body = DashboardStats
        ),
        (status = 401, description = "Invalid token", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["analytics"],
    operation_id = "dashboard"
)]
#[get("/analytics/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let stats = state.dashboard.dashboard(user.id()).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, no-cache, must-revalidate"))
        .json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatusCount;
    use crate::inbound::http::test_utils::{api_app, bearer, mocked_state};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[actix_web::test]
    async fn dashboard_serialises_camel_case() {
        let state = mocked_state(|m| {
            m.signed_in_as(1);
            m.dashboard.expect_dashboard().returning(|_| {
                Ok(DashboardStats {
                    total_tasks: 3,
                    completed_tasks: 1,
                    tasks_by_status: vec![
                        StatusCount {
                            status: "Todo".to_owned(),
                            count: 2,
                        },
                        StatusCount {
                            status: "Done".to_owned(),
                            count: 1,
                        },
                    ],
                    ..DashboardStats::empty()
                })
            });
        });
        let app = actix_test::init_service(api_app(state)).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/analytics/dashboard")
            .insert_header(bearer("t"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["totalTasks"], 3);
        assert_eq!(body["tasksByStatus"][0]["status"], "Todo");
        assert_eq!(body["weeklyCompletion"], Value::Array(Vec::new()));
    }

    #[rstest]
    #[actix_web::test]
    async fn store_outage_is_service_unavailable() {
        let state = mocked_state(|m| {
            m.signed_in_as(1);
            m.dashboard
                .expect_dashboard()
                .returning(|_| Err(Error::service_unavailable("analytics repository unavailable")));
        });
        let app = actix_test::init_service(api_app(state)).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/analytics/dashboard")
            .insert_header(bearer("t"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
