// src/bin/keygen.rs
//! Prints a fresh Ed25519 key pair as environment variable lines.
//!
//! Nothing is written to disk. To rotate, move the old `ED25519_PUBLIC_KEY`
//! into the front of `ED25519_PUBLIC_KEYS_PREVIOUS` and install the new pair.

use anyhow::Context;
use log::info;
use signature_notary::keys::registry::KeyRegistry;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let generated = KeyRegistry::generate_key_pair().context("key generation failed")?;
    info!("Generated new Ed25519 key pair");

    println!("ED25519_PRIVATE_KEY={}", generated.private_key);
    println!("ED25519_PUBLIC_KEY={}", generated.public_key);

    if let Ok(current) = std::env::var("ED25519_PUBLIC_KEY") {
        let previous = std::env::var("ED25519_PUBLIC_KEYS_PREVIOUS").unwrap_or_default();
        let rotated = std::iter::once(current.trim().to_string())
            .chain(
                previous
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string),
            )
            .collect::<Vec<_>>()
            .join(",");
        println!("ED25519_PUBLIC_KEYS_PREVIOUS={}", rotated);
    }
    Ok(())
}
