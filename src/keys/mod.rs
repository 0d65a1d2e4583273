// src/keys/mod.rs
//! Ed25519 key material and the registry of trusted keys.

pub mod material;
pub mod registry;
