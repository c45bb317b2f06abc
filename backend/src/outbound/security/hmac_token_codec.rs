//! HS256 JSON Web Token implementation of [`TokenCodec`].
//!
//! Tokens are `base64url(header).base64url(claims).base64url(signature)`
//! without padding. Only the `HS256` algorithm is accepted on decode.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::domain::SessionClaims;
use crate::domain::ports::{TokenCodec, TokenCodecError};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// Signs and verifies session tokens with a shared HMAC-SHA256 secret.
pub struct HmacTokenCodec {
    secret: Zeroizing<Vec<u8>>,
}

impl std::fmt::Debug for HmacTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacTokenCodec")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl HmacTokenCodec {
    pub fn new(secret: Zeroizing<Vec<u8>>) -> Self {
        Self { secret }
    }

    fn mac(&self) -> Result<HmacSha256, TokenCodecError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|err| TokenCodecError::encoding(err.to_string()))
    }

    fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, TokenCodecError> {
        URL_SAFE_NO_PAD
            .decode(segment)
            .map_err(|err| TokenCodecError::malformed(format!("{name}: {err}")))
    }
}

impl TokenCodec for HmacTokenCodec {
    fn issue(&self, claims: &SessionClaims) -> Result<String, TokenCodecError> {
        let header = serde_json::to_vec(&Header {
            alg: ALGORITHM.to_owned(),
            typ: Some("JWT".to_owned()),
        })
        .map_err(|err| TokenCodecError::encoding(err.to_string()))?;
        let payload =
            serde_json::to_vec(claims).map_err(|err| TokenCodecError::encoding(err.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(payload)
        );
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    fn decode(&self, token: &str) -> Result<SessionClaims, TokenCodecError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenCodecError::malformed("expected three segments"));
        };

        let parsed: Header = serde_json::from_slice(&Self::decode_segment(header, "header")?)
            .map_err(|err| TokenCodecError::malformed(format!("header: {err}")))?;
        if parsed.alg != ALGORITHM {
            return Err(TokenCodecError::malformed(format!(
                "unsupported algorithm {}",
                parsed.alg
            )));
        }

        let signature = Self::decode_segment(signature, "signature")?;
        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenCodecError::bad_signature())?;

        serde_json::from_slice(&Self::decode_segment(payload, "payload")?)
            .map_err(|err| TokenCodecError::malformed(format!("claims: {err}")))
    }
}
