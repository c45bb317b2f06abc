//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers take an [`AuthenticatedUser`] argument instead of reading the
//! `Authorization` header themselves. Every failure, whether the header is
//! missing, malformed, expired or signed with another key, surfaces as the
//! same `401` so callers learn nothing about why a token was refused.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{Error, INVALID_TOKEN, SessionClaims, UserId};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller, resolved from a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(SessionClaims);

impl AuthenticatedUser {
    pub fn id(&self) -> UserId {
        self.0.user_id
    }

    pub fn claims(&self) -> &SessionClaims {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        return Err(Error::internal("HTTP state is not registered"));
    };
    let Some(token) = bearer_token(req) else {
        debug!(path = %req.path(), "request without bearer token");
        return Err(Error::unauthorized(INVALID_TOKEN));
    };
    state.sessions.verify_token(token).map(AuthenticatedUser)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
