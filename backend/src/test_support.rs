//! Test utilities shared by unit and integration tests.
//!
//! Compiled only with the `test-support` feature. Builds a fully wired
//! [`HttpState`] over the in-memory store with cheap Argon2 parameters and a
//! controllable clock.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use zeroize::Zeroizing;

use crate::inbound::http::state::{HttpState, HttpStateDependencies};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::{Argon2CredentialHasher, HmacTokenCodec};

/// Signing secret used by [`memory_state`].
pub const TEST_TOKEN_SECRET: [u8; 32] = [42; 32];

/// Clock whose reading only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Argon2id with the smallest accepted costs.
pub fn cheap_hasher() -> Argon2CredentialHasher {
    match Argon2CredentialHasher::with_params(8, 1, 1) {
        Ok(hasher) => hasher,
        Err(error) => panic!("minimal argon2 parameters rejected: {error}"),
    }
}

/// Codec signing with [`TEST_TOKEN_SECRET`].
pub fn test_token_codec() -> HmacTokenCodec {
    HmacTokenCodec::new(Zeroizing::new(TEST_TOKEN_SECRET.to_vec()))
}

/// Wired HTTP state over a fresh in-memory store.
///
/// The store is returned too so tests can seed tasks, which have no port of
/// their own.
pub fn memory_state(clock: Arc<MutableClock>) -> (HttpState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new(clock.clone()));
    let state = HttpState::from_dependencies(HttpStateDependencies {
        users: Arc::clone(&store),
        workspaces: Arc::clone(&store),
        projects: Arc::clone(&store),
        tasks: Arc::clone(&store),
        notifications: Arc::clone(&store),
        analytics: Arc::clone(&store),
        hasher: Arc::new(cheap_hasher()),
        tokens: Arc::new(test_token_codec()),
        clock,
    });
    (state, store)
}
