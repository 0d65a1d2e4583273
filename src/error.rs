// src/error.rs
//! Error taxonomy for the signing and verification core.
//!
//! A signature that fails to verify is *not* an error: the verifier reports
//! it as `false` / `None`. The variants here cover malformed caller input,
//! broken key configuration and transport encoding problems only.

use thiserror::Error;

/// Errors surfaced by the codec, key registry, signer and verifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotaryError {
    /// Malformed fingerprint, identity or timestamp. Caller error, never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Missing or malformed key material. Fatal to the operation.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed transport encoding on input (base64, hex, UTF-8, JSON, SPKI).
    #[error("decode error: {0}")]
    Decode(String),

    /// A value could not be serialized into a share token.
    #[error("encode error: {0}")]
    Encode(String),
}

impl NotaryError {
    /// True for errors caused by the caller's request rather than the deployment.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, NotaryError::InvalidInput(_) | NotaryError::Decode(_))
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, NotaryError>;
