// src/utils/mod.rs
//! Encoding and hashing helpers.

pub mod codec;
pub mod crypto;
