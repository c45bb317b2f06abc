//! Backend entry-point: loads configuration, prepares the store and serves
//! the REST API with its OpenAPI docs.

mod server;

use std::sync::Arc;

use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use nexus::domain::ports::TokenCodec;
use nexus::inbound::http::token_config::{BuildMode, token_settings_from_env};
use nexus::outbound::persistence::{DbPool, run_pending_migrations};
use nexus::outbound::security::HmacTokenCodec;
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let token_settings =
        token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
            .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %token_settings.fingerprint(),
        ephemeral = token_settings.ephemeral,
        "token signing secret loaded"
    );
    let tokens: Arc<dyn TokenCodec> = Arc::new(HmacTokenCodec::new(token_settings.secret));

    let mut config = ServerConfig::new(bind_addr);
    if let Some(pool_config) = settings.pool_config().map_err(std::io::Error::other)? {
        run_pending_migrations(pool_config.database_url())
            .await
            .map_err(std::io::Error::other)?;
        let pool = DbPool::new(pool_config)
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::prometheus_metrics()?));

    let (server, health_state) = create_server(config, tokens)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
