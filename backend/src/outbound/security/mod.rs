//! Credential hashing and session token adapters.

mod argon2_hasher;
mod hmac_token_codec;

pub use argon2_hasher::Argon2CredentialHasher;
pub use hmac_token_codec::HmacTokenCodec;
