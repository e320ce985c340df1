//! Runs one full exchange against the in-memory mint.
//!
//! `RUST_LOG=debug cargo run --bin exchange_demo` shows every protocol step.

use adaptor_bridge::{
    BridgeConfig, InMemoryMint, KeyPair, MessageSigner, PaymentUnit, TargetCommitment, UnitLedger,
    UnitState, payer, schnorr, signer,
};
use anyhow::{Context, bail};
use sha2::{Digest, Sha256};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = BridgeConfig::from_env().context("loading bridge config")?;
    info!(max_nonce_attempts = config.max_nonce_attempts, "config loaded");

    let mut rng = rand::rng();
    let payer_key = KeyPair::random(&mut rng)?;
    let signer_key = KeyPair::random(&mut rng)?;

    // Signer: sign the target message and publish only its nonce.
    let target_digest: [u8; 32] = Sha256::digest(b"deliver order #1").into();
    let target_sig = signer_key.sign_digest(&target_digest)?;
    let (target, hidden) =
        TargetCommitment::from_signature(&target_sig, signer_key.public_key_x(), target_digest);
    let adaptor_point = target.adaptor_point()?;
    info!(target_nonce = %hex::encode(target.nonce_x), "target commitment published");

    // Payer: lock units to its own key and pre-sign them against T.
    let units = vec![
        PaymentUnit::new(64, "demo-unit-a"),
        PaymentUnit::new(32, "demo-unit-b"),
        PaymentUnit::new(4, "demo-unit-c"),
    ];
    let mut mint = InMemoryMint::new();
    let mut ledger = UnitLedger::new();
    for unit in &units {
        ledger.register(mint.issue(unit.clone(), payer_key.public_x())?)?;
    }
    let book = payer::lock_batch(&config, &mut rng, &payer_key, &adaptor_point, &units, 100)?;
    ledger.advance_all(UnitState::Generated, UnitState::Shared)?;

    // Signer: verify everything, then complete and redeem.
    let verified =
        signer::accept_batch(&book, &payer_key.public_x(), &units, 100, &adaptor_point)?;
    ledger.advance_all(UnitState::Shared, UnitState::Verified)?;
    let spends = signer::complete_batch(verified, &hidden)?;
    let mut redeemed = 0;
    for (id, spend) in &spends {
        redeemed += mint.redeem(id, spend)?;
        ledger.advance(id, UnitState::Completed)?;
    }
    info!(redeemed, "signer redeemed all units");

    // Payer: recover the target signature from what settled.
    let Some((id, recovered)) = payer::recover_target_signature(&mint, &book, &target)? else {
        bail!("no settled unit carried a witness");
    };
    ledger.advance(&id, UnitState::Extracted)?;
    if !schnorr::verify(&recovered.to_bytes(), &target_digest, &signer_key.public_x()) {
        bail!("recovered target signature does not verify");
    }
    info!(unit = %id, signature = %recovered.to_hex(), "target signature recovered");
    Ok(())
}
