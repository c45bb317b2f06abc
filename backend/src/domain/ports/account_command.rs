//! Driving ports for account registration, login and token-based identity.
//!
//! Inbound adapters call these without knowing how credentials are hashed
//! or how tokens are signed.

use async_trait::async_trait;

use crate::domain::{AuthSession, Error, LoginCredentials, Registration, SessionClaims, User, UserId};

/// Use-cases that create sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a user, seed their default workspace and issue a token.
    async fn register(&self, registration: &Registration) -> Result<AuthSession, Error>;

    /// Check credentials and issue a token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;
}

/// Use-cases that resolve an existing session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Verify a bearer token and return its claims.
    ///
    /// Every failure is reported as the same unauthorised error.
    fn verify_token(&self, token: &str) -> Result<SessionClaims, Error>;

    /// Reload the user behind a verified token.
    async fn current_user(&self, user: UserId) -> Result<User, Error>;
}
