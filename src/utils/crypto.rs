// src/utils/crypto.rs
//! Content fingerprinting.
//!
//! Fingerprints are SHA-256 digests (via `ring::digest`) rendered as lowercase
//! hex, the form callers submit as `fileHash`.

use crate::utils::codec::raw_to_hex;
use ring::digest::{digest, SHA256};

/// Computes the hex SHA-256 fingerprint of some content.
///
/// # Example
/// ```
/// use signature_notary::utils::crypto::fingerprint;
/// assert_eq!(
///     fingerprint(b"abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn fingerprint(data: &[u8]) -> String {
    raw_to_hex(digest(&SHA256, data).as_ref())
}
