//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};
#[cfg(feature = "metrics")]
pub use metrics::prometheus_metrics;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use nexus::Trace;
#[cfg(debug_assertions)]
use nexus::doc::ApiDoc;
use nexus::domain::ports::TokenCodec;
use nexus::inbound::http::api_scope;
use nexus::inbound::http::health::{HealthState, live, ready};
use nexus::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api_scope())
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the Actix server over the configured store.
///
/// Readiness is marked once the listener is bound; the returned [`Server`]
/// must be awaited to drive it.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    config: ServerConfig,
    tokens: Arc<dyn TokenCodec>,
) -> std::io::Result<(Server, web::Data<HealthState>)> {
    let (http_state, store) = build_http_state(config.db_pool.as_ref(), tokens);
    let health_state = web::Data::new(HealthState::new(store));
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        db_pool: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, store = ?store, "listening");
    health_state.mark_ready();
    Ok((server, health_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use nexus::outbound::security::HmacTokenCodec;
    use zeroize::Zeroizing;

    fn memory_app_deps() -> AppDependencies {
        let tokens: Arc<dyn TokenCodec> =
            Arc::new(HmacTokenCodec::new(Zeroizing::new(vec![3_u8; 32])));
        let (http_state, store) = build_http_state(None, tokens);
        let health_state = web::Data::new(HealthState::new(store));
        AppDependencies {
            health_state,
            http_state,
        }
    }

    #[actix_web::test]
    async fn readiness_tracks_health_state() {
        let deps = memory_app_deps();
        let health = deps.health_state.clone();
        let app = test::init_service(build_app(deps)).await;

        let before =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(before.status(), StatusCode::SERVICE_UNAVAILABLE);

        health.mark_ready();
        let after =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(after.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(after).await;
        assert_eq!(body["store"], "memory");
    }

    #[actix_web::test]
    async fn api_routes_are_mounted_and_traced() {
        let app = test::init_service(build_app(memory_app_deps())).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/api/v1/auth/me").to_request())
                .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.headers().contains_key(nexus::domain::TRACE_ID_HEADER));
    }
}
