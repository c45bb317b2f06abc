//! Builders selecting Diesel or in-memory adapters for the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::warn;

use nexus::domain::ports::TokenCodec;
use nexus::inbound::http::health::StoreKind;
use nexus::inbound::http::state::{HttpState, HttpStateDependencies};
use nexus::outbound::memory::InMemoryStore;
use nexus::outbound::persistence::{
    DbPool, DieselAnalyticsRepository, DieselNotificationRepository, DieselProjectRepository,
    DieselTaskRepository, DieselUserRepository, DieselWorkspaceRepository,
};
use nexus::outbound::security::Argon2CredentialHasher;

fn diesel_state(pool: &DbPool, tokens: Arc<dyn TokenCodec>, clock: Arc<dyn Clock>) -> HttpState {
    HttpState::from_dependencies(HttpStateDependencies {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        workspaces: Arc::new(DieselWorkspaceRepository::new(pool.clone())),
        projects: Arc::new(DieselProjectRepository::new(pool.clone())),
        tasks: Arc::new(DieselTaskRepository::new(pool.clone())),
        notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
        analytics: Arc::new(DieselAnalyticsRepository::new(pool.clone())),
        hasher: Arc::new(Argon2CredentialHasher::default()),
        tokens,
        clock,
    })
}

fn memory_state(tokens: Arc<dyn TokenCodec>, clock: Arc<dyn Clock>) -> HttpState {
    let store = Arc::new(InMemoryStore::new(Arc::clone(&clock)));
    HttpState::from_dependencies(HttpStateDependencies {
        users: Arc::clone(&store),
        workspaces: Arc::clone(&store),
        projects: Arc::clone(&store),
        tasks: Arc::clone(&store),
        notifications: Arc::clone(&store),
        analytics: store,
        hasher: Arc::new(Argon2CredentialHasher::default()),
        tokens,
        clock,
    })
}

/// Build the shared HTTP state and report which store backs it.
///
/// Without a pool everything lives in process memory and is lost on exit.
pub(super) fn build_http_state(
    db_pool: Option<&DbPool>,
    tokens: Arc<dyn TokenCodec>,
) -> (web::Data<HttpState>, StoreKind) {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match db_pool {
        Some(pool) => (
            web::Data::new(diesel_state(pool, tokens, clock)),
            StoreKind::Postgres,
        ),
        None => {
            warn!("no database configured; using the in-memory store (data is not persisted)");
            (web::Data::new(memory_state(tokens, clock)), StoreKind::Memory)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus::domain::ErrorCode;
    use nexus::outbound::security::HmacTokenCodec;
    use rstest::rstest;
    use zeroize::Zeroizing;

    #[rstest]
    fn missing_pool_selects_memory_store() {
        let tokens: Arc<dyn TokenCodec> =
            Arc::new(HmacTokenCodec::new(Zeroizing::new(vec![9_u8; 32])));

        let (state, store) = build_http_state(None, tokens);

        assert_eq!(store, StoreKind::Memory);
        let err = state
            .sessions
            .verify_token("not-a-token")
            .expect_err("garbage rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
