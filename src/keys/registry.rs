// src/keys/registry.rs
//! Key registry: which key signs, which keys verify.
//!
//! The registry is built from an explicit [`KeyConfig`] and keeps an immutable
//! [`KeyRing`] snapshot. Readers clone the snapshot `Arc`; a rotation builds a
//! complete new ring and swaps it in with [`KeyRegistry::reload`], so a reader
//! never observes a half-rotated key set.
//!
//! # Accepted Key Set
//! `{current} ∪ history`, current first. Keys never expire on their own;
//! dropping one from configuration and reloading is the revocation act.

use crate::error::{NotaryError, Result};
use crate::keys::material::{PublicKey, SigningKeyPair};
use crate::models::signature::PublicKeysDocument;
use crate::settings::KeyConfig;
use log::{info, warn};
use ring::rand::SystemRandom;
use ring::signature::Ed25519KeyPair;
use std::sync::{Arc, RwLock};

/// Freshly generated key material, standard base64 of DER.
#[derive(Debug, Clone)]
pub struct GeneratedKeyPair {
    /// PKCS#8 DER, base64
    pub private_key: String,
    /// SPKI DER, base64
    pub public_key: String,
}

/// Immutable snapshot of the configured keys.
#[derive(Debug)]
pub struct KeyRing {
    signing: Option<Arc<SigningKeyPair>>,
    current: Option<PublicKey>,
    history: Vec<PublicKey>,
}

impl KeyRing {
    /// Parses and cross-checks a key configuration.
    ///
    /// # Errors
    /// `NotaryError::Configuration` when:
    /// - any configured key is malformed
    /// - the private key does not belong to the configured current public key
    pub fn from_config(config: &KeyConfig) -> Result<Self> {
        if config.is_empty() && config.allow_ephemeral {
            return Self::ephemeral(config);
        }

        let signing = config
            .private_key
            .as_deref()
            .map(SigningKeyPair::from_pkcs8_base64)
            .transpose()?;

        let configured_current = config
            .public_key
            .as_deref()
            .map(|encoded| parse_configured_key("current public key", encoded))
            .transpose()?;

        let current = match (&signing, configured_current) {
            (Some(pair), Some(current)) if *pair.public_key() != current => {
                return Err(NotaryError::Configuration(
                    "private key does not match the current public key".to_string(),
                ));
            }
            (Some(pair), None) => Some(*pair.public_key()),
            (_, current) => current,
        };

        let history = config
            .previous_public_keys
            .iter()
            .enumerate()
            .map(|(i, encoded)| parse_configured_key(&format!("historical key #{}", i), encoded))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            signing: signing.map(Arc::new),
            current,
            history,
        })
    }

    fn ephemeral(config: &KeyConfig) -> Result<Self> {
        warn!("No Ed25519 key configured; generating an ephemeral key pair. Signatures will not survive a restart.");
        let generated = KeyRegistry::generate_key_pair()?;
        Self::from_config(&KeyConfig {
            private_key: Some(generated.private_key),
            public_key: Some(generated.public_key),
            previous_public_keys: config.previous_public_keys.clone(),
            allow_ephemeral: false,
        })
    }

    pub fn can_sign(&self) -> bool {
        self.signing.is_some()
    }

    pub fn history(&self) -> &[PublicKey] {
        &self.history
    }
}

fn parse_configured_key(label: &str, encoded: &str) -> Result<PublicKey> {
    PublicKey::from_spki_base64(encoded)
        .map_err(|e| NotaryError::Configuration(format!("{} is malformed: {}", label, e)))
}

/// Thread-safe holder of the active [`KeyRing`].
#[derive(Debug)]
pub struct KeyRegistry {
    ring: RwLock<Arc<KeyRing>>,
}

impl KeyRegistry {
    /// Builds a registry from explicit configuration.
    pub fn new(config: &KeyConfig) -> Result<Self> {
        let ring = KeyRing::from_config(config)?;
        info!(
            "Key registry loaded (signing: {}, accepted keys: {})",
            ring.can_sign(),
            ring.current.iter().count() + ring.history.len()
        );
        Ok(Self {
            ring: RwLock::new(Arc::new(ring)),
        })
    }

    /// Builds a registry that can only verify.
    pub fn verification_only(current: &str, history: &[String]) -> Result<Self> {
        Self::new(&KeyConfig {
            private_key: None,
            public_key: Some(current.to_string()),
            previous_public_keys: history.to_vec(),
            allow_ephemeral: false,
        })
    }

    /// Replaces the whole key set. On error the previous ring stays active.
    pub fn reload(&self, config: &KeyConfig) -> Result<()> {
        let ring = Arc::new(KeyRing::from_config(config)?);
        info!(
            "Key registry reloaded ({} historical keys)",
            ring.history.len()
        );
        let mut guard = self.ring.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = ring;
        Ok(())
    }

    /// Current snapshot; cheap to call, safe to hold across a reload.
    pub fn snapshot(&self) -> Arc<KeyRing> {
        self.ring
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns the current signing key pair.
    ///
    /// # Errors
    /// `NotaryError::Configuration` if no private key is configured.
    pub fn signing_key_pair(&self) -> Result<Arc<SigningKeyPair>> {
        self.snapshot().signing.clone().ok_or_else(|| {
            NotaryError::Configuration("no Ed25519 private key configured for signing".to_string())
        })
    }

    /// Returns the accepted verification keys, current first.
    ///
    /// # Errors
    /// `NotaryError::Configuration` if no current public key is configured.
    pub fn accepted_public_keys(&self) -> Result<Vec<PublicKey>> {
        let ring = self.snapshot();
        let current = ring.current.ok_or_else(|| {
            NotaryError::Configuration("no current Ed25519 public key configured".to_string())
        })?;

        let mut keys = Vec::with_capacity(1 + ring.history.len());
        keys.push(current);
        keys.extend(ring.history.iter().copied());
        Ok(keys)
    }

    /// Builds the document published at `/.well-known/public-keys.json`.
    pub fn discovery_document(&self) -> Result<PublicKeysDocument> {
        let mut keys = self.accepted_public_keys()?.into_iter().map(|k| k.to_spki_base64());
        let current = keys.next().ok_or_else(|| {
            NotaryError::Configuration("accepted key set is empty".to_string())
        })?;
        Ok(PublicKeysDocument {
            current,
            history: keys.collect(),
        })
    }

    /// Generates a new Ed25519 key pair. Nothing is persisted; the caller is
    /// responsible for moving the material into secret configuration.
    pub fn generate_key_pair() -> Result<GeneratedKeyPair> {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).map_err(|_| {
            NotaryError::Configuration("system RNG failed during key generation".to_string())
        })?;
        let pair = SigningKeyPair::from_pkcs8_der(pkcs8.as_ref())?;

        Ok(GeneratedKeyPair {
            private_key: base64::encode(pkcs8.as_ref()),
            public_key: pair.public_key().to_spki_base64(),
        })
    }
}
