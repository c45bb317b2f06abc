//! Port for account persistence.
//!
//! Registration is a single atomic operation: the user row, a default
//! workspace, the owner membership and a starter project are written
//! together or not at all.

use async_trait::async_trait;

use crate::domain::{EmailAddress, NewProject, NewWorkspace, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The email is already registered.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Everything written when an account is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: Username,
    pub email: EmailAddress,
    /// Argon2 PHC string; never the plaintext password.
    pub password_hash: String,
    pub workspace: NewWorkspace,
    pub project: NewProject,
}

/// A user together with the stored password hash, for login checks only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user and password hash by normalised email.
    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Create the user and seed their default workspace in one transaction.
    ///
    /// Returns [`UserRepositoryError::DuplicateEmail`] when the email is taken,
    /// including when a concurrent registration wins the race.
    async fn register_account(&self, account: &NewAccount) -> Result<User, UserRepositoryError>;
}
