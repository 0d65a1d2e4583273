// src/keys/material.rs
//! Ed25519 key material in its exchange formats.
//!
//! Public keys travel as SPKI DER (standard base64). For Ed25519 the DER is a
//! fixed 12-byte ASN.1 prefix followed by the 32-byte raw key, so parsing is
//! a prefix check plus a slice. Private keys travel as PKCS#8 DER and are
//! parsed by `ring`.

use crate::error::{NotaryError, Result};
use ring::signature::{Ed25519KeyPair, KeyPair, Signature};
use std::fmt;

/// `SEQUENCE { SEQUENCE { OID 1.3.101.112 } BIT STRING (33 bytes, 0 unused bits) }`
pub const ED25519_SPKI_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

/// Raw Ed25519 public key length.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Total SPKI DER length for an Ed25519 key.
pub const SPKI_LEN: usize = ED25519_SPKI_PREFIX.len() + PUBLIC_KEY_LEN;

/// Ed25519 public key, kept in raw form and rendered as SPKI on demand.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    raw: [u8; PUBLIC_KEY_LEN],
}

impl PublicKey {
    pub fn from_raw(raw: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self { raw }
    }

    /// Parses SPKI DER bytes.
    ///
    /// # Errors
    /// `NotaryError::Decode` if the length or the algorithm prefix is wrong.
    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        if der.len() != SPKI_LEN {
            return Err(NotaryError::Decode(format!(
                "Ed25519 SPKI must be {} bytes, got {}",
                SPKI_LEN,
                der.len()
            )));
        }
        let (prefix, key) = der.split_at(ED25519_SPKI_PREFIX.len());
        if prefix != ED25519_SPKI_PREFIX {
            return Err(NotaryError::Decode(
                "SPKI does not describe an Ed25519 key".to_string(),
            ));
        }
        let mut raw = [0u8; PUBLIC_KEY_LEN];
        raw.copy_from_slice(key);
        Ok(Self { raw })
    }

    /// Parses standard-base64 SPKI DER, the transport form of public keys.
    pub fn from_spki_base64(encoded: &str) -> Result<Self> {
        let der = base64::decode(encoded.trim())
            .map_err(|e| NotaryError::Decode(format!("invalid base64 public key: {}", e)))?;
        Self::from_spki_der(&der)
    }

    pub fn raw(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.raw
    }

    pub fn to_spki_der(&self) -> Vec<u8> {
        let mut der = Vec::with_capacity(SPKI_LEN);
        der.extend_from_slice(&ED25519_SPKI_PREFIX);
        der.extend_from_slice(&self.raw);
        der
    }

    /// Standard-base64 SPKI DER.
    pub fn to_spki_base64(&self) -> String {
        base64::encode(self.to_spki_der())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&hex::encode(self.raw)).finish()
    }
}

/// Current signing key pair. The private half is never exported.
pub struct SigningKeyPair {
    key_pair: Ed25519KeyPair,
    public_key: PublicKey,
}

impl SigningKeyPair {
    /// Parses PKCS#8 DER bytes.
    ///
    /// Both v1 documents (private key only) and v2 documents (with the public
    /// key embedded) are accepted; for v2 the embedded key must be consistent.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let key_pair = Ed25519KeyPair::from_pkcs8_maybe_unchecked(der).map_err(|e| {
            NotaryError::Configuration(format!("invalid PKCS#8 Ed25519 private key: {}", e))
        })?;
        let mut raw = [0u8; PUBLIC_KEY_LEN];
        raw.copy_from_slice(key_pair.public_key().as_ref());
        Ok(Self {
            key_pair,
            public_key: PublicKey::from_raw(raw),
        })
    }

    /// Parses standard-base64 PKCS#8 DER.
    pub fn from_pkcs8_base64(encoded: &str) -> Result<Self> {
        let der = base64::decode(encoded.trim()).map_err(|e| {
            NotaryError::Configuration(format!("private key is not valid base64: {}", e))
        })?;
        Self::from_pkcs8_der(&der)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Produces a detached 64-byte Ed25519 signature. Deterministic per message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.key_pair.sign(message)
    }
}

impl fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
