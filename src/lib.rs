// src/lib.rs

//! # Signature Notary
//!
//! Detached Ed25519 signatures over `fingerprint:identity:timestamp`, with
//! verification against a rotating set of trusted public keys.
//!
//! ## Architecture Overview
//! 1. **Codec** (`utils::codec`): share tokens, hex, canonical message
//! 2. **Key Registry** (`keys`): current signing key and accepted verification keys
//! 3. **Signer / Verifier** (`services`): issuance and multi-key verification
//! 4. **Trust Estimator** (`services::trust`): cosmetic trust bucket from a count
//! 5. **HTTP layer** (`services::api_server`) and storage seam (`storage`)

pub mod error;
pub mod keys;
pub mod models;
pub mod services;
pub mod settings;
pub mod storage;
pub mod utils;

pub use error::{NotaryError, Result};
pub use keys::material::PublicKey;
pub use keys::registry::KeyRegistry;
pub use models::signature::{SignatureBundle, SignaturePayload};
pub use services::signer::Signer;
pub use services::trust::bucket_for;
pub use services::verifier::Verifier;
