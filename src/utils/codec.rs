// src/utils/codec.rs
//! Boundary encodings for the notary.
//!
//! Provides:
//! - URL-safe, padding-free base64 share tokens (RFC 4648 §5) wrapping JSON
//! - Tolerant URL-safe base64 decoding for signatures
//! - Hex helpers and the fingerprint shape check
//! - Canonical message construction shared by the signer and the verifier

use crate::error::{NotaryError, Result};
use crate::models::signature::SignaturePayload;
use serde::{de::DeserializeOwned, Serialize};

/// Length of a hex-encoded SHA-256 fingerprint.
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// Serializes a value to JSON and encodes it as a URL-safe base64 token.
///
/// # Returns
/// A token containing only `[A-Za-z0-9_-]`, safe to embed as a query parameter.
///
/// # Errors
/// `NotaryError::Encode` if the value cannot be serialized.
pub fn encode_token<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).map_err(|e| NotaryError::Encode(e.to_string()))?;
    Ok(encode_url_safe(json.as_bytes()))
}

/// Inverse of [`encode_token`].
///
/// Accepts tokens with or without `=` padding and with either base64 alphabet.
///
/// # Errors
/// `NotaryError::Decode` if the base64, the UTF-8 or the JSON is invalid.
pub fn decode_token<T: DeserializeOwned>(token: &str) -> Result<T> {
    let bytes = decode_url_safe(token)?;
    let json = String::from_utf8(bytes)
        .map_err(|e| NotaryError::Decode(format!("token is not valid UTF-8: {}", e)))?;
    serde_json::from_str(&json)
        .map_err(|e| NotaryError::Decode(format!("token is not valid JSON: {}", e)))
}

/// Encodes raw bytes as URL-safe base64 without padding.
pub fn encode_url_safe(bytes: &[u8]) -> String {
    base64::encode_config(bytes, base64::URL_SAFE_NO_PAD)
}

/// Decodes URL-safe base64, tolerating padding and the standard `+`/`/` alphabet.
pub fn decode_url_safe(encoded: &str) -> Result<Vec<u8>> {
    let normalized: String = encoded
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    base64::decode_config(&normalized, base64::URL_SAFE_NO_PAD)
        .map_err(|e| NotaryError::Decode(format!("invalid base64url: {}", e)))
}

/// Encodes bytes as lowercase hex.
pub fn raw_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decodes a hex string (either case) into bytes.
pub fn hex_to_raw(encoded: &str) -> Result<Vec<u8>> {
    hex::decode(encoded).map_err(|e| NotaryError::Decode(format!("invalid hex: {}", e)))
}

/// Checks that a fingerprint is exactly 64 hex characters (a SHA-256 digest).
pub fn validate_fingerprint(fingerprint: &str) -> Result<()> {
    if fingerprint.len() != FINGERPRINT_HEX_LEN {
        return Err(NotaryError::InvalidInput(format!(
            "fingerprint must be {} hex characters, got {}",
            FINGERPRINT_HEX_LEN,
            fingerprint.len()
        )));
    }
    if !fingerprint.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(NotaryError::InvalidInput(
            "fingerprint contains non-hex characters".to_string(),
        ));
    }
    Ok(())
}

/// Builds the canonical message `fingerprint:identity:timestamp` as UTF-8 bytes.
///
/// Field order, separator and encoding are part of the signature format.
/// Changing any of them invalidates every signature already issued.
pub fn canonical_message(payload: &SignaturePayload) -> Vec<u8> {
    format!(
        "{}:{}:{}",
        payload.fingerprint, payload.identity, payload.timestamp
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::signature::SignatureBundle;
    use serde_json::json;

    #[test]
    fn token_round_trips_multibyte_text() {
        let value = json!({ "identity": "zoë@exämple.com", "note": "署名 ✓ 🔏" });
        let token = encode_token(&value).unwrap();

        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
        assert!(!token.contains('='));

        let decoded: serde_json::Value = decode_token(&token).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn token_round_trips_bundle() {
        let bundle = SignatureBundle {
            signature: "c2lnbmF0dXJl".into(),
            public_key: "MCowBQYDK2VwAyEA".into(),
            timestamp: 1_700_000_000_000,
        };
        let decoded: SignatureBundle = decode_token(&encode_token(&bundle).unwrap()).unwrap();
        assert_eq!(decoded, bundle);
    }

    #[test]
    fn decode_tolerates_padding_and_standard_alphabet() {
        let raw = [0xfb, 0xff, 0xfe, 0x01];
        let url_safe = encode_url_safe(&raw);
        assert_eq!(url_safe, "-__-AQ");

        assert_eq!(decode_url_safe(&url_safe).unwrap(), raw);
        assert_eq!(decode_url_safe("-__-AQ==").unwrap(), raw);
        assert_eq!(decode_url_safe("+//+AQ==").unwrap(), raw);
    }

    #[test]
    fn decode_token_rejects_garbage() {
        assert!(matches!(
            decode_token::<serde_json::Value>("not base64 !!"),
            Err(NotaryError::Decode(_))
        ));
        // "\xff\xfe" is not UTF-8
        assert!(matches!(
            decode_token::<serde_json::Value>(&encode_url_safe(&[0xff, 0xfe])),
            Err(NotaryError::Decode(_))
        ));
        assert!(matches!(
            decode_token::<serde_json::Value>(&encode_url_safe(b"{not json")),
            Err(NotaryError::Decode(_))
        ));
    }

    #[test]
    fn hex_helpers() {
        assert_eq!(raw_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
        assert_eq!(hex_to_raw("DEADbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(hex_to_raw("xyz"), Err(NotaryError::Decode(_))));
    }

    #[test]
    fn fingerprint_shape() {
        assert!(validate_fingerprint(&"a".repeat(64)).is_ok());
        assert!(validate_fingerprint(&"AbCdEf0123456789".repeat(4)).is_ok());
        assert!(validate_fingerprint(&"a".repeat(63)).is_err());
        assert!(validate_fingerprint(&"a".repeat(65)).is_err());
        assert!(matches!(
            validate_fingerprint(&"g".repeat(64)),
            Err(NotaryError::InvalidInput(_))
        ));
    }

    #[test]
    fn canonical_message_layout() {
        let payload = SignaturePayload::new("a".repeat(64), "user@example.com", 1_700_000_000_000);
        let message = canonical_message(&payload);
        assert_eq!(
            message,
            format!("{}:user@example.com:1700000000000", "a".repeat(64)).into_bytes()
        );
    }
}
