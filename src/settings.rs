// src/settings.rs
//! Process configuration.
//!
//! Values are layered with the `config` crate:
//! 1. built-in defaults
//! 2. optional TOML file (`config/notary.toml`, or the path in `NOTARY_CONFIG`)
//! 3. `NOTARY_*` environment variables (`NOTARY_SERVER__PORT=8080`)
//! 4. the deployment variables the key material has always been shipped in:
//!    `ED25519_PRIVATE_KEY`, `ED25519_PUBLIC_KEY`, `ED25519_PUBLIC_KEYS_PREVIOUS`,
//!    `ALLOWED_EMAIL_DOMAINS` and `VERIFY_BASE_URL`
//!
//! Only the binary reads the environment. The key registry receives an
//! explicit [`KeyConfig`] and never looks anything up on its own.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};
use std::env;

/// Default location of the optional configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/notary";

/// Top-level settings for the notary service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub keys: KeyConfig,
    #[serde(default)]
    pub policy: PolicySettings,
    #[serde(default)]
    pub share: ShareSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Key material handed to the [`KeyRegistry`](crate::keys::registry::KeyRegistry).
///
/// All values are standard base64 of DER: PKCS#8 for the private key and
/// SPKI for public keys.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyConfig {
    /// Current signing key. Absent on verification-only deployments.
    #[serde(default)]
    pub private_key: Option<String>,

    /// Current public key. Derived from `private_key` when omitted.
    #[serde(default)]
    pub public_key: Option<String>,

    /// Retired public keys still accepted for verification, in priority order.
    #[serde(default, deserialize_with = "deserialize_key_list")]
    pub previous_public_keys: Vec<String>,

    /// Generate a throwaway key pair when nothing is configured (development only).
    #[serde(default)]
    pub allow_ephemeral: bool,
}

impl KeyConfig {
    /// True when neither half of the current key pair is configured.
    pub fn is_empty(&self) -> bool {
        self.private_key.is_none() && self.public_key.is_none()
    }
}

/// Caller-side identity policy layered on top of the core.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicySettings {
    /// Email domains allowed to request signatures. Empty means everyone.
    #[serde(default, deserialize_with = "deserialize_key_list")]
    pub allowed_email_domains: Vec<String>,
}

impl PolicySettings {
    /// Checks an identity against the allowed email domains.
    ///
    /// The domain is whatever follows the last `@`, compared case-insensitively.
    pub fn is_allowed_identity(&self, identity: &str) -> bool {
        if self.allowed_email_domains.is_empty() {
            return true;
        }
        let domain = match identity.rsplit_once('@') {
            Some((_, domain)) if !domain.is_empty() => domain.to_lowercase(),
            _ => return false,
        };
        self.allowed_email_domains
            .iter()
            .any(|allowed| allowed.trim().eq_ignore_ascii_case(&domain))
    }

    /// Accepts `local@domain` addresses that also pass [`is_allowed_identity`](Self::is_allowed_identity).
    pub fn accepts_address(&self, identity: &str) -> bool {
        let well_formed = matches!(
            identity.rsplit_once('@'),
            Some((local, domain)) if !local.trim().is_empty() && !domain.trim().is_empty()
        );
        well_formed && self.is_allowed_identity(identity)
    }
}

/// Settings for shareable verification links.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShareSettings {
    /// Origin prepended to `/verify?data=...` links, e.g. `https://notary.example.com`.
    #[serde(default)]
    pub verify_base_url: String,
}

impl ShareSettings {
    /// Builds the verification link for an encoded share token.
    pub fn verification_url(&self, token: &str) -> String {
        format!("{}/verify?data={}", self.verify_base_url.trim_end_matches('/'), token)
    }
}

impl Settings {
    /// Loads settings from defaults, the optional config file and the environment.
    ///
    /// # Errors
    /// Returns `ConfigError` when a source cannot be parsed or a value has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("NOTARY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000_i64)?
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("NOTARY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("keys.private_key", non_empty_var("ED25519_PRIVATE_KEY"))?
            .set_override_option("keys.public_key", non_empty_var("ED25519_PUBLIC_KEY"))?
            .set_override_option(
                "keys.previous_public_keys",
                non_empty_var("ED25519_PUBLIC_KEYS_PREVIOUS"),
            )?
            .set_override_option(
                "policy.allowed_email_domains",
                non_empty_var("ALLOWED_EMAIL_DOMAINS"),
            )?
            .set_override_option("share.verify_base_url", non_empty_var("VERIFY_BASE_URL"))?
            .build()?
            .try_deserialize()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts either a list or a single string separated by commas and/or whitespace.
fn deserialize_key_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum KeyList {
        Joined(String),
        Many(Vec<String>),
    }

    let entries = match KeyList::deserialize(deserializer)? {
        KeyList::Joined(joined) => split_list(&joined),
        KeyList::Many(many) => many
            .iter()
            .flat_map(|entry| split_list(entry))
            .collect(),
    };
    Ok(entries)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
