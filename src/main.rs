// src/main.rs

//! # Signature Notary - Main Entry Point
//!
//! Loads configuration, builds the key registry and starts the API server.
//!
//! ## Environment Variables
//! - `ED25519_PRIVATE_KEY`: Base64 PKCS#8 DER signing key (omit for verification-only)
//! - `ED25519_PUBLIC_KEY`: Base64 SPKI DER current public key
//! - `ED25519_PUBLIC_KEYS_PREVIOUS`: (Optional) comma-separated retired public keys
//! - `ALLOWED_EMAIL_DOMAINS`: (Optional) domains allowed to request signatures
//! - `VERIFY_BASE_URL`: (Optional) origin used in share links
//! - `NOTARY_CONFIG`: (Optional) config file path (default: config/notary.toml)
//! - `RUST_LOG`: (Optional) log filter (default: info)

use anyhow::Context;
use dotenv::dotenv;
use log::info;
use signature_notary::keys::registry::KeyRegistry;
use signature_notary::services::api_server::ApiServer;
use signature_notary::settings::Settings;
use signature_notary::storage::signature_store::MemoryStore;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

/// Initialization Sequence
/// 1. Load `.env` and configuration
/// 2. Parse and cross-check key material
/// 3. Start API server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load().context("failed to load configuration")?;

    let registry = KeyRegistry::new(&settings.keys).context("invalid Ed25519 key configuration")?;

    let api_server = ApiServer::new(
        Arc::new(registry),
        Arc::new(MemoryStore::new()),
        settings.policy.clone(),
        settings.share.clone(),
    );

    let host: IpAddr = settings
        .server
        .host
        .parse()
        .with_context(|| format!("invalid server host {}", settings.server.host))?;
    let addr = SocketAddr::new(host, settings.server.port);

    info!("Available endpoints:");
    info!("- POST /api/sign");
    info!("- POST /api/verify");
    info!("- GET  /.well-known/public-keys.json");
    info!("- GET  /api/trust/:identity");
    info!("- GET  /api/share/:signature");
    info!("- GET  /verify?data=<token>");

    api_server.run(addr).await.context("API server failed")?;
    Ok(())
}
