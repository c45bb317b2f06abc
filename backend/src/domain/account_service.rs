//! Account domain service: registration, login and token verification.
//!
//! Implements [`AccountCommand`] and [`AccountQuery`] over a user repository,
//! a credential hasher and a token codec.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountCommand, AccountQuery, CredentialHasher, CredentialHasherError, NewAccount,
    TokenCodec, UserRepository, UserRepositoryError,
};
use crate::domain::{
    AuthSession, Error, LoginCredentials, NewProject, NewWorkspace, Registration, SessionClaims,
    User, UserId,
};

/// Message for every failed login, whether the email or the password was wrong.
pub const INVALID_CREDENTIALS: &str = "invalid email or password";
/// Message for every rejected bearer token.
pub const INVALID_TOKEN: &str = "invalid token";

/// Account service implementing the identity driving ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountService<U, H> {
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        tokens: Arc<dyn TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: CredentialHasher,
{
    fn map_user_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::DuplicateEmail { .. } => Self::duplicate_email(),
        }
    }

    fn map_hasher_error(error: CredentialHasherError) -> Error {
        Error::internal(error.to_string())
    }

    fn duplicate_email() -> Error {
        Error::conflict("email already registered").with_details(json!({
            "field": "email",
            "code": "duplicate_email",
        }))
    }

    fn issue_session(&self, user: User) -> Result<AuthSession, Error> {
        let claims = SessionClaims::for_user(&user, self.clock.utc());
        let token = self
            .tokens
            .issue(&claims)
            .map_err(|err| Error::internal(err.to_string()))?;
        Ok(AuthSession { token, user })
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: CredentialHasher,
{
    async fn register(&self, registration: &Registration) -> Result<AuthSession, Error> {
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(Self::map_user_error)?;
        if existing.is_some() {
            return Err(Self::duplicate_email());
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(Self::map_hasher_error)?;
        let account = NewAccount {
            username: registration.username().clone(),
            email: registration.email().clone(),
            password_hash,
            workspace: NewWorkspace::default_for(registration.username()),
            project: NewProject::starter(),
        };
        let user = self
            .users
            .register_account(&account)
            .await
            .map_err(Self::map_user_error)?;

        info!(user_id = %user.id, "account registered");
        self.issue_session(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let stored = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(Self::map_user_error)?;
        let Some(stored) = stored else {
            debug!("login rejected: unknown email");
            // Unknown emails pay the same hashing cost as wrong passwords.
            if let Err(error) = self.hasher.hash(credentials.password()).await {
                debug!(%error, "decoy hash failed");
            }
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(Self::map_hasher_error)?;
        if !matches {
            debug!(user_id = %stored.user.id, "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = %stored.user.id, "login succeeded");
        self.issue_session(stored.user)
    }
}

#[async_trait]
impl<U, H> AccountQuery for AccountService<U, H>
where
    U: UserRepository,
    H: CredentialHasher,
{
    fn verify_token(&self, token: &str) -> Result<SessionClaims, Error> {
        let claims = self.tokens.decode(token).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            Error::unauthorized(INVALID_TOKEN)
        })?;
        if claims.is_expired(self.clock.utc()) {
            debug!(user_id = %claims.user_id, "bearer token expired");
            return Err(Error::unauthorized(INVALID_TOKEN));
        }
        Ok(claims)
    }

    async fn current_user(&self, user: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_TOKEN))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
