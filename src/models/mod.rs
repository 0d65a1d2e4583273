// src/models/mod.rs
//! Data structures exchanged with callers.

pub mod signature;
pub mod trust;
