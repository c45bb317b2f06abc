//! Argon2id implementation of [`CredentialHasher`].
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) with a fresh random salt.
//! The work runs on the blocking pool so request workers stay responsive.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::TraceId;
use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// Argon2id password hasher.
#[derive(Debug, Clone)]
pub struct Argon2CredentialHasher {
    params: Params,
}

impl Default for Argon2CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2CredentialHasher {
    /// Hasher with explicit cost parameters.
    ///
    /// Tests use this with minimal costs; production uses [`Default`].
    ///
    /// # Errors
    /// Returns [`CredentialHasherError::Hashing`] when the parameters are
    /// outside Argon2's accepted ranges.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, CredentialHasherError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| CredentialHasherError::hashing(err.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, password: &str) -> Result<String, CredentialHasherError> {
        let params = self.params.clone();
        let password = Zeroizing::new(password.to_owned());
        TraceId::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Self::argon2(params)
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|err| CredentialHasherError::hashing(err.to_string()))
        })
        .await
        .map_err(|err| CredentialHasherError::hashing(err.to_string()))?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialHasherError> {
        let params = self.params.clone();
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        TraceId::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash)
                .map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
            match Self::argon2(params).verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(err) => Err(CredentialHasherError::hashing(err.to_string())),
            }
        })
        .await
        .map_err(|err| CredentialHasherError::hashing(err.to_string()))?
    }
}
