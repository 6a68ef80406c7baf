//! Ed25519 key pair helpers in the base64 format the credential portal expects.

use super::signer::signing_key_from_base64;
use crate::domain::errors::DecodingError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use ed25519_dalek::{SECRET_KEY_LENGTH, SigningKey};
use rand::RngCore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// Seed to keep in `.env`; never uploaded
    pub private_key_b64: String,
    /// Key to paste into the credential portal
    pub public_key_b64: String,
}

pub fn generate_keypair() -> KeyPair {
    let mut seed = [0u8; SECRET_KEY_LENGTH];
    rand::rng().fill_bytes(&mut seed);
    let signing_key = SigningKey::from_bytes(&seed);

    KeyPair {
        private_key_b64: BASE64_STANDARD.encode(signing_key.to_bytes()),
        public_key_b64: BASE64_STANDARD.encode(signing_key.verifying_key().to_bytes()),
    }
}

/// Public key matching a stored seed
pub fn public_key_for(private_key_b64: &str) -> Result<String, DecodingError> {
    let signing_key = signing_key_from_base64(private_key_b64)?;
    Ok(BASE64_STANDARD.encode(signing_key.verifying_key().to_bytes()))
}
