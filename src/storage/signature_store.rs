// src/storage/signature_store.rs
//! Storage seam for issued bundles and per-identity signature counts.
//!
//! The signing core never persists anything. The HTTP layer records each
//! issued bundle (keyed by its signature value, which is how share links look
//! it up) and bumps the identity's counter for trust estimation. Production
//! deployments plug a key-value store in behind [`SignatureStore`];
//! [`MemoryStore`] keeps everything in process.

use crate::models::signature::SignatureBundle;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// External store contract used by the HTTP layer.
pub trait SignatureStore: Send + Sync {
    /// Records a bundle under its signature value. Overwrites silently.
    fn save_bundle(&self, bundle: &SignatureBundle);

    /// Looks a bundle up by signature value.
    fn bundle(&self, signature: &str) -> Option<SignatureBundle>;

    /// Increments and returns the identity's signature count.
    fn increment_signatures(&self, identity: &str) -> u64;

    /// Current signature count for an identity (0 when unknown).
    fn signature_count(&self, identity: &str) -> u64;
}

#[derive(Default)]
struct MemoryState {
    bundles: HashMap<String, SignatureBundle>,
    counts: HashMap<String, u64>,
}

/// In-process [`SignatureStore`]; contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        // The maps stay consistent even if a holder panicked mid-call.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SignatureStore for MemoryStore {
    fn save_bundle(&self, bundle: &SignatureBundle) {
        self.state()
            .bundles
            .insert(bundle.signature.clone(), bundle.clone());
    }

    fn bundle(&self, signature: &str) -> Option<SignatureBundle> {
        self.state().bundles.get(signature).cloned()
    }

    fn increment_signatures(&self, identity: &str) -> u64 {
        let mut state = self.state();
        let count = state.counts.entry(identity.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    fn signature_count(&self, identity: &str) -> u64 {
        self.state().counts.get(identity).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(signature: &str) -> SignatureBundle {
        SignatureBundle {
            signature: signature.to_string(),
            public_key: "MCowBQYDK2VwAyEA".to_string(),
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_save_and_lookup_bundle() {
        let store = MemoryStore::new();
        assert!(store.bundle("sig-1").is_none());

        store.save_bundle(&bundle("sig-1"));
        assert_eq!(store.bundle("sig-1"), Some(bundle("sig-1")));
        assert!(store.bundle("sig-2").is_none());
    }

    #[test]
    fn test_counts_start_at_zero_and_increment() {
        let store = MemoryStore::new();
        assert_eq!(store.signature_count("user@example.com"), 0);

        assert_eq!(store.increment_signatures("user@example.com"), 1);
        assert_eq!(store.increment_signatures("user@example.com"), 2);
        assert_eq!(store.signature_count("user@example.com"), 2);
        assert_eq!(store.signature_count("other@example.com"), 0);
    }

    #[test]
    fn test_store_is_shareable_across_threads() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.increment_signatures("busy@example.com");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.signature_count("busy@example.com"), 800);
    }
}
