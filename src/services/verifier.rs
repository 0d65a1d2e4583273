// src/services/verifier.rs
//! Signature verification service.
//!
//! Rebuilds the canonical message from the payload fields and checks a
//! detached Ed25519 signature either against one given key or against every
//! key the [`KeyRegistry`] still accepts. A signature that does not match is
//! a normal `false` / `None` result, never an error.

use crate::error::{NotaryError, Result};
use crate::keys::material::PublicKey;
use crate::keys::registry::KeyRegistry;
use crate::models::signature::SignaturePayload;
use crate::utils::codec::{canonical_message, decode_url_safe};
use log::debug;
use ring::signature::{UnparsedPublicKey, ED25519};
use std::sync::Arc;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Verifies signatures using public keys only.
#[derive(Clone)]
pub struct Verifier {
    /// Source of the accepted key set
    registry: Arc<KeyRegistry>,
}

impl Verifier {
    pub fn new(registry: Arc<KeyRegistry>) -> Self {
        Self { registry }
    }

    /// Verifies a signature against one explicitly supplied key.
    ///
    /// # Arguments
    /// * `inputs` - payload fields the signature should cover
    /// * `signature_token` - URL-safe base64 signature
    /// * `public_key_token` - standard base64 SPKI DER key
    ///
    /// # Returns
    /// - `Ok(true)` if the signature is valid for this key
    /// - `Ok(false)` if it is not, or is not 64 bytes long
    ///
    /// # Errors
    /// - `InvalidInput` if the payload shape is wrong or the signature is empty
    /// - `Decode` if the signature or key encoding is malformed
    pub fn verify_with_key(
        inputs: &SignaturePayload,
        signature_token: &str,
        public_key_token: &str,
    ) -> Result<bool> {
        inputs.validate()?;
        let signature = decode_signature(signature_token)?;
        let public_key = PublicKey::from_spki_base64(public_key_token)?;

        Ok(check(&canonical_message(inputs), &signature, &public_key))
    }

    /// Verifies a signature against the accepted key set, current key first.
    ///
    /// # Returns
    /// The first key that validates, or `None` when none does.
    ///
    /// # Errors
    /// - `InvalidInput` / `Decode` for malformed input
    /// - `Configuration` if the registry has no current key
    pub fn verify_against_accepted_keys(
        &self,
        inputs: &SignaturePayload,
        signature_token: &str,
    ) -> Result<Option<PublicKey>> {
        inputs.validate()?;
        let signature = decode_signature(signature_token)?;
        let accepted = self.registry.accepted_public_keys()?;
        let message = canonical_message(inputs);

        let matched = accepted
            .into_iter()
            .enumerate()
            .find(|(position, key)| {
                let valid = check(&message, &signature, key);
                debug!("Key #{} {:?}: {}", position, key, if valid { "match" } else { "no match" });
                valid
            })
            .map(|(_, key)| key);

        Ok(matched)
    }
}

/// An empty token is a malformed request rather than a signature that fails to match.
fn decode_signature(signature_token: &str) -> Result<Vec<u8>> {
    if signature_token.trim().is_empty() {
        return Err(NotaryError::InvalidInput("signature must not be empty".to_string()));
    }
    decode_url_safe(signature_token)
}

/// Raw Ed25519 check. Wrong-length signatures are rejected without touching the key.
fn check(message: &[u8], signature: &[u8], public_key: &PublicKey) -> bool {
    if signature.len() != SIGNATURE_LEN {
        return false;
    }
    UnparsedPublicKey::new(&ED25519, public_key.raw())
        .verify(message, signature)
        .is_ok()
}
