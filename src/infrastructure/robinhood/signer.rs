//! Ed25519 request signing for the Robinhood Crypto Trading API.
//!
//! The signed message is `api_key || timestamp || path || method || body`,
//! where `path` includes the query string and `body` is empty for bodyless
//! requests. The server rejects timestamps more than ~30s away from its clock.

use crate::config::Credentials;
use crate::domain::errors::DecodingError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use ed25519_dalek::{SECRET_KEY_LENGTH, Signer, SigningKey};

pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Decode a base64 Ed25519 seed into a signing key
pub fn signing_key_from_base64(private_key_b64: &str) -> Result<SigningKey, DecodingError> {
    let seed = BASE64_STANDARD.decode(private_key_b64.trim())?;
    let seed: [u8; SECRET_KEY_LENGTH] =
        seed.as_slice().try_into().map_err(|_| DecodingError::SeedLength {
            expected: SECRET_KEY_LENGTH,
            actual: seed.len(),
        })?;
    Ok(SigningKey::from_bytes(&seed))
}

/// Sign one request and return the base64 signature.
///
/// Pure: identical inputs always give the identical signature.
pub fn sign_message(
    api_key: &str,
    private_key_b64: &str,
    timestamp: i64,
    path: &str,
    method: &str,
    body: &str,
) -> Result<String, DecodingError> {
    let signing_key = signing_key_from_base64(private_key_b64)?;
    let message = format!("{}{}{}{}{}", api_key, timestamp, path, method, body);
    let signature = signing_key.sign(message.as_bytes());
    Ok(BASE64_STANDARD.encode(signature.to_bytes()))
}

/// Header values attached to every signed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub api_key: String,
    pub signature: String,
    pub timestamp: i64,
}

impl AuthHeaders {
    pub fn to_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("x-api-key", self.api_key.clone()),
            ("x-signature", self.signature.clone()),
            ("x-timestamp", self.timestamp.to_string()),
            ("content-type", CONTENT_TYPE.to_string()),
        ]
    }
}

pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn headers(
        &self,
        method: &str,
        path: &str,
        body: &str,
        timestamp: i64,
    ) -> Result<AuthHeaders, DecodingError> {
        let signature = sign_message(
            &self.credentials.api_key,
            &self.credentials.private_key_b64,
            timestamp,
            path,
            method,
            body,
        )?;

        Ok(AuthHeaders {
            api_key: self.credentials.api_key.clone(),
            signature,
            timestamp,
        })
    }
}
