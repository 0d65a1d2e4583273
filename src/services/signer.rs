// src/services/signer.rs
//! Signature issuance service.
//!
//! Validates a [`SignaturePayload`], builds the canonical message and signs it
//! with the registry's current Ed25519 key. Persisting the bundle or counting
//! signatures per identity is left to the caller.

use crate::error::Result;
use crate::keys::registry::KeyRegistry;
use crate::models::signature::{SignatureBundle, SignaturePayload};
use crate::utils::codec::{canonical_message, encode_url_safe};
use log::info;
use std::sync::Arc;

/// Issues detached signatures with the current key.
#[derive(Clone)]
pub struct Signer {
    /// Shared key registry; only the current private key is used
    registry: Arc<KeyRegistry>,
}

impl Signer {
    pub fn new(registry: Arc<KeyRegistry>) -> Self {
        Self { registry }
    }

    /// Signs a payload and returns the transport-ready bundle.
    ///
    /// # Arguments
    /// * `payload` - fingerprint, identity and timestamp to bind together
    ///
    /// # Returns
    /// Bundle with the URL-safe base64 signature, the SPKI base64 public key
    /// that produced it, and the echoed timestamp.
    ///
    /// # Errors
    /// - `InvalidInput` if the payload shape is wrong (checked before any key access)
    /// - `Configuration` if no private key is configured
    pub fn issue(&self, payload: &SignaturePayload) -> Result<SignatureBundle> {
        payload.validate()?;

        let key_pair = self.registry.signing_key_pair()?;
        let message = canonical_message(payload);
        let signature = key_pair.sign(&message);

        info!(
            "Issued signature for fingerprint {} at {}",
            payload.fingerprint, payload.timestamp
        );

        Ok(SignatureBundle {
            signature: encode_url_safe(signature.as_ref()),
            public_key: key_pair.public_key().to_spki_base64(),
            timestamp: payload.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotaryError;
    use crate::settings::KeyConfig;
    use crate::utils::codec::decode_url_safe;

    fn signer() -> (Signer, String) {
        let generated = KeyRegistry::generate_key_pair().unwrap();
        let registry = KeyRegistry::new(&KeyConfig {
            private_key: Some(generated.private_key),
            ..KeyConfig::default()
        })
        .unwrap();
        (Signer::new(Arc::new(registry)), generated.public_key)
    }

    fn payload() -> SignaturePayload {
        SignaturePayload::new("a".repeat(64), "user@example.com", 1_700_000_000_000)
    }

    #[test]
    fn bundle_carries_signing_key_and_timestamp() {
        let (signer, public_key) = signer();
        let bundle = signer.issue(&payload()).unwrap();

        assert_eq!(bundle.public_key, public_key);
        assert_eq!(bundle.timestamp, 1_700_000_000_000);
        assert_eq!(decode_url_safe(&bundle.signature).unwrap().len(), 64);
        assert!(!bundle.signature.contains('='));
    }

    #[test]
    fn signing_is_deterministic() {
        let (signer, _) = signer();
        let first = signer.issue(&payload()).unwrap();
        let second = signer.issue(&payload()).unwrap();
        assert_eq!(first.signature, second.signature);
    }

    #[test]
    fn different_payloads_sign_differently() {
        let (signer, _) = signer();
        let mut other = payload();
        other.identity = "other@example.com".into();
        assert_ne!(
            signer.issue(&payload()).unwrap().signature,
            signer.issue(&other).unwrap().signature
        );
    }

    #[test]
    fn invalid_payload_is_rejected_before_key_lookup() {
        // No private key configured: validation must still win.
        let public_only = KeyRegistry::generate_key_pair().unwrap();
        let registry = KeyRegistry::verification_only(&public_only.public_key, &[]).unwrap();
        let signer = Signer::new(Arc::new(registry));

        let mut bad = payload();
        bad.fingerprint = "zz".into();
        assert!(matches!(signer.issue(&bad), Err(NotaryError::InvalidInput(_))));

        assert!(matches!(
            signer.issue(&payload()),
            Err(NotaryError::Configuration(_))
        ));
    }
}
