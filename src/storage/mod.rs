// src/storage/mod.rs
//! Persistence seam for bundles and counters.

pub mod signature_store;
