// src/models/trust.rs
//! Trust level data model.

use serde::{Deserialize, Serialize};

/// Coarse, non-authoritative trust bucket derived from a signature count.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    None,
    Low,
    Medium,
    High,
}

/// Response of `GET /api/trust/:identity`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrustReport {
    pub identity: String,
    pub total_signatures: u64,
    pub trust_level: TrustLevel,
}
