// src/services/mod.rs
//! Business logic and the HTTP API.

pub mod api_server;
pub mod signer;
pub mod trust;
pub mod verifier;
