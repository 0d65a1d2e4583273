// src/models/signature.rs
//! Signature data model.
//!
//! Defines the payload that gets signed, the bundle returned to callers, and
//! the JSON shapes exchanged with the HTTP layer.
//!
//! # Wire Names
//! Field names follow the published JSON interface (`fileHash`, `publicKey`),
//! so the Rust names are mapped with serde attributes.

use crate::error::{NotaryError, Result};
use crate::utils::codec::validate_fingerprint;
use serde::{Deserialize, Serialize};

/// Input to signing and message reconstruction.
///
/// All three fields take part in the canonical message
/// `fingerprint:identity:timestamp`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignaturePayload {
    /// Hex SHA-256 of the signed content (64 chars, either case, used verbatim)
    #[serde(rename = "fileHash")]
    pub fingerprint: String,

    /// Opaque verified identity, e.g. an email address
    pub identity: String,

    /// Signing time in milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl SignaturePayload {
    pub fn new(fingerprint: impl Into<String>, identity: impl Into<String>, timestamp: i64) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            identity: identity.into(),
            timestamp,
        }
    }

    /// Checks the payload shape before any cryptographic work.
    ///
    /// # Errors
    /// `NotaryError::InvalidInput` when:
    /// - the fingerprint is not 64 hex characters
    /// - the identity is empty
    /// - the timestamp is zero or negative
    pub fn validate(&self) -> Result<()> {
        validate_fingerprint(&self.fingerprint)?;
        if self.identity.is_empty() {
            return Err(NotaryError::InvalidInput("identity must not be empty".to_string()));
        }
        if self.timestamp <= 0 {
            return Err(NotaryError::InvalidInput(format!(
                "timestamp must be a positive millisecond value, got {}",
                self.timestamp
            )));
        }
        Ok(())
    }
}

/// Output of signing; everything a verifier needs besides the payload.
///
/// Immutable once issued. External stores may keep a copy keyed by `signature`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignatureBundle {
    /// 64-byte Ed25519 signature, URL-safe base64 without padding
    pub signature: String,

    /// SPKI DER of the signing key, standard base64
    #[serde(rename = "publicKey")]
    pub public_key: String,

    /// Timestamp echoed from the payload
    pub timestamp: i64,
}

/// Body of `POST /api/sign`.
///
/// The timestamp is optional; the server clock is used when it is omitted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SigningRequest {
    #[serde(rename = "fileHash")]
    pub fingerprint: String,
    pub identity: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Body of `POST /api/verify`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VerificationRequest {
    #[serde(flatten)]
    pub payload: SignaturePayload,
    pub signature: String,
}

/// Result of a verification against the accepted key set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub valid: bool,

    /// Matching key (SPKI base64), present only when `valid` is true
    #[serde(rename = "publicKey")]
    pub public_key: Option<String>,
}

impl VerificationResult {
    pub fn from_match(matched: Option<String>) -> Self {
        Self {
            valid: matched.is_some(),
            public_key: matched,
        }
    }
}

/// Key discovery document served at `/.well-known/public-keys.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicKeysDocument {
    /// Current key, SPKI DER base64
    pub current: String,
    /// Retired keys still accepted, SPKI DER base64
    pub history: Vec<String>,
}

/// Shareable verification link for a stored bundle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub token: String,
    #[serde(rename = "verifyUrl")]
    pub verify_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> SignaturePayload {
        SignaturePayload::new("f".repeat(64), "user@example.com", 1_700_000_000_000)
    }

    #[test]
    fn valid_payload_passes() {
        assert!(valid_payload().validate().is_ok());
    }

    #[test]
    fn rejects_bad_fields() {
        let mut p = valid_payload();
        p.fingerprint = "abc".into();
        assert!(matches!(p.validate(), Err(NotaryError::InvalidInput(_))));

        let mut p = valid_payload();
        p.identity.clear();
        assert!(matches!(p.validate(), Err(NotaryError::InvalidInput(_))));

        for timestamp in [0, -1, i64::MIN] {
            let mut p = valid_payload();
            p.timestamp = timestamp;
            assert!(matches!(p.validate(), Err(NotaryError::InvalidInput(_))));
        }
    }

    #[test]
    fn verification_request_uses_wire_names() {
        let request: VerificationRequest = serde_json::from_value(json!({
            "fileHash": "a".repeat(64),
            "identity": "user@example.com",
            "timestamp": 1_700_000_000_000_i64,
            "signature": "abc"
        }))
        .unwrap();
        assert_eq!(request.payload.fingerprint, "a".repeat(64));
        assert_eq!(request.signature, "abc");
    }

    #[test]
    fn verification_result_serializes_null_key() {
        let value = serde_json::to_value(VerificationResult::from_match(None)).unwrap();
        assert_eq!(value, json!({ "valid": false, "publicKey": null }));
    }

    #[test]
    fn signing_request_timestamp_is_optional() {
        let request: SigningRequest =
            serde_json::from_value(json!({ "fileHash": "a".repeat(64), "identity": "u@x.io" }))
                .unwrap();
        assert_eq!(request.timestamp, None);
    }
}
