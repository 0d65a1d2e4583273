// src/services/trust.rs
//! Trust estimation from an external signature count.
//!
//! Purely cosmetic: the bucket is a hint for display and carries no security
//! meaning. The count itself lives in an external store.

use crate::models::trust::{TrustLevel, TrustReport};

/// Maps a signature count to its trust bucket.
///
/// `0 → none`, `1..=3 → low`, `4..=10 → medium`, `>10 → high`.
/// Negative counts clamp to `none`.
pub fn bucket_for(count: i64) -> TrustLevel {
    match count {
        i64::MIN..=0 => TrustLevel::None,
        1..=3 => TrustLevel::Low,
        4..=10 => TrustLevel::Medium,
        _ => TrustLevel::High,
    }
}

/// Builds the trust query response for an identity.
pub fn report_for(identity: &str, total_signatures: u64) -> TrustReport {
    TrustReport {
        identity: identity.to_string(),
        total_signatures,
        trust_level: bucket_for(i64::try_from(total_signatures).unwrap_or(i64::MAX)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bucket_boundaries() {
        assert_eq!(bucket_for(0), TrustLevel::None);
        assert_eq!(bucket_for(1), TrustLevel::Low);
        assert_eq!(bucket_for(3), TrustLevel::Low);
        assert_eq!(bucket_for(4), TrustLevel::Medium);
        assert_eq!(bucket_for(10), TrustLevel::Medium);
        assert_eq!(bucket_for(11), TrustLevel::High);
        assert_eq!(bucket_for(i64::MAX), TrustLevel::High);
    }

    #[test]
    fn negative_counts_clamp_to_none() {
        assert_eq!(bucket_for(-1), TrustLevel::None);
        assert_eq!(bucket_for(i64::MIN), TrustLevel::None);
    }

    #[test]
    fn report_serializes_wire_shape() {
        let report = report_for("user@example.com", 5);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({ "identity": "user@example.com", "totalSignatures": 5, "trustLevel": "medium" })
        );
        assert_eq!(report_for("x", u64::MAX).trust_level, TrustLevel::High);
    }
}
