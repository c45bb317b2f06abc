//! Port for signing and verifying session tokens.
//!
//! Codecs check structure and signature only. Expiry is judged by the
//! account service against its injected clock.

use crate::domain::SessionClaims;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token codec adapters.
    pub enum TokenCodecError {
        /// The token is not well-formed.
        Malformed { message: String } => "malformed token: {message}",
        /// The signature does not match the payload.
        BadSignature => "token signature mismatch",
        /// Claims could not be encoded.
        Encoding { message: String } => "token encoding failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign `claims` into a compact token.
    fn issue(&self, claims: &SessionClaims) -> Result<String, TokenCodecError>;

    /// Verify the signature of `token` and decode its claims.
    fn decode(&self, token: &str) -> Result<SessionClaims, TokenCodecError>;
}
