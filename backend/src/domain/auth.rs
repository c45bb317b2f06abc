//! Authentication primitives: registration input, login credentials and the
//! claims carried by issued session tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{EmailAddress, User, UserId, UserValidationError, Username};

/// Minimum accepted password length at registration.
pub const PASSWORD_MIN: usize = 8;

/// Lifetime of an issued session token, in days.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Validation failures for registration and login payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Username or email failed validation.
    User(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password is shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
}

impl CredentialValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::User(inner) => inner.field(),
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
        }
    }

    /// Stable machine-readable code for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::User(inner) => inner.code(),
            Self::EmptyPassword => "empty_password",
            Self::PasswordTooShort { .. } => "password_too_short",
        }
    }
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

impl From<UserValidationError> for CredentialValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

/// Validated registration input.
///
/// The password is held in a zeroizing buffer until it has been hashed.
///
/// # Examples
/// ```
/// use nexus::domain::Registration;
///
/// let reg = Registration::try_from_parts("ada", "Ada@Example.com", "analytical").unwrap();
/// assert_eq!(reg.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let username = Username::new(username)?;
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised the same way as at registration.
/// - `password` is non-empty but otherwise kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Claims carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the authenticated user id.
    #[serde(rename = "sub")]
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    /// Issued-at, seconds since the Unix epoch.
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expiry, seconds since the Unix epoch.
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl SessionClaims {
    /// Build claims for `user` issued at `now` with the fixed session lifetime.
    pub fn for_user(user: &User, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id,
            username: user.username.to_string(),
            email: user.email.to_string(),
            issued_at: now.timestamp(),
            expires_at: (now + Duration::days(SESSION_TTL_DAYS)).timestamp(),
        }
    }

    /// Whether the claims have expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at
    }
}

/// Result of a successful register or login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Bearer token for subsequent requests.
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ad", "ada@example.com", "password1", "username", "username_too_short")]
    #[case("ada", "not-an-email", "password1", "email", "invalid_email")]
    #[case("ada", "ada@example.com", "", "password", "empty_password")]
    #[case("ada", "ada@example.com", "short", "password", "password_too_short")]
    fn registration_rejects_invalid_input(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = Registration::try_from_parts(username, email, password)
            .expect_err("invalid registration");
        assert_eq!(err.field(), field);
        assert_eq!(err.code(), code);
    }

    #[rstest]
    fn login_keeps_password_verbatim() {
        let creds = LoginCredentials::try_from_parts(" ADA@example.com", " pass word ")
            .expect("valid credentials");
        assert_eq!(creds.email().as_ref(), "ada@example.com");
        assert_eq!(creds.password(), " pass word ");
    }

    #[rstest]
    fn claims_expire_after_session_ttl() {
        let user = User {
            id: UserId::new(9),
            username: Username::new("ada").expect("username"),
            email: EmailAddress::new("ada@example.com").expect("email"),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        let now = DateTime::<Utc>::UNIX_EPOCH + Duration::days(100);
        let claims = SessionClaims::for_user(&user, now);
        assert_eq!(
            claims.expires_at - claims.issued_at,
            Duration::days(SESSION_TTL_DAYS).num_seconds()
        );
        assert!(!claims.is_expired(now + Duration::days(6)));
        assert!(claims.is_expired(now + Duration::days(7)));
    }
}
