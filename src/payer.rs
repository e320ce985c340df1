//! Payer role: lock a batch of units to an adaptor point, then recover the
//! target signature once any of them is spent.
//!
//! Stateless: everything the payer keeps between steps is the
//! [`AdaptorBook`] it returns and passes back in.

use std::collections::BTreeMap;

use crate::adaptor::{AdaptorRecord, TargetCommitment};
use crate::complete;
use crate::config::BridgeConfig;
use crate::error::AdaptorError;
use crate::keys::KeyPair;
use crate::schnorr::Signature;
use crate::settlement::{Settlement, SettlementObserver};
use crate::sign::generate_adaptor_with;
use crate::unit::{PaymentUnit, UnitId, validate_batch};
use crypto_rs::secp256k1::Secp256k1Point;
use rand::{CryptoRng, RngCore};
use tracing::{debug, info, warn};

/// Adaptor records keyed by unit.
pub type AdaptorBook = BTreeMap<UnitId, AdaptorRecord>;

/// Pre-sign every unit's spend digest against `adaptor_point`.
///
/// The batch must pass [`validate_batch`] for `expected_total` before
/// anything is signed. Each unit gets its own nonce.
pub fn lock_batch<R: RngCore + CryptoRng + ?Sized>(
    config: &BridgeConfig,
    rng: &mut R,
    key: &KeyPair,
    adaptor_point: &Secp256k1Point,
    units: &[PaymentUnit],
    expected_total: u64,
) -> Result<AdaptorBook, AdaptorError> {
    config.validate()?;
    validate_batch(units, expected_total)?;

    let mut book = AdaptorBook::new();
    for unit in units {
        let record = generate_adaptor_with(
            rng,
            config.max_nonce_attempts,
            key,
            adaptor_point,
            &unit.message_digest(),
        )?;
        book.insert(unit.id(), record);
    }
    info!(units = book.len(), "batch locked to adaptor point");
    Ok(book)
}

/// Look for a spent unit and turn its witness into the verified target signature.
///
/// Returns `Ok(None)` while no unit in `book` is spent with a witness. Units
/// spent without a witness are skipped, and so are spends whose witness does
/// not reveal a verifying target signature (for example a unit the payer
/// reclaimed with its own key). If every witnessed spend fails, the last
/// failure is returned.
pub fn recover_target_signature<O: SettlementObserver + ?Sized>(
    observer: &O,
    book: &AdaptorBook,
    target: &TargetCommitment,
) -> Result<Option<(UnitId, Signature)>, AdaptorError> {
    let mut last_failure = None;
    for (id, record) in book {
        let Some(Settlement::Spent {
            witness: Some(witness),
        }) = observer.settlement(id)
        else {
            continue;
        };
        debug!(unit = %id, "spent unit observed");
        let recovered = Signature::from_bytes(&witness)
            .and_then(|completed| complete::recover_target_signature(&completed, record, target));
        match recovered {
            Ok(sig) => {
                info!(unit = %id, "target signature extracted");
                return Ok(Some((*id, sig)));
            }
            Err(err) => {
                warn!(unit = %id, error = %err, "spend witness does not reveal the target");
                last_failure = Some(err);
            }
        }
    }
    match last_failure {
        Some(err) => Err(err),
        None => Ok(None),
    }
}
