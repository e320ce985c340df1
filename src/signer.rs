//! Signer role: accept a payer's batch of adaptor records, then complete them
//! with the hidden scalar of the target signature.

use std::collections::BTreeMap;

use crate::complete::{CompletedSignature, complete_checked};
use crate::error::AdaptorError;
use crate::payer::AdaptorBook;
use crate::unit::{PaymentUnit, UnitId, validate_batch};
use crate::verify::{VerifiedAdaptor, accept_adaptor};
use crypto_rs::secp256k1::{Secp256k1Point, Secp256k1Scalar};
use tracing::info;

/// Verify one record per unit. The book must cover exactly `units`, and the
/// units must pass [`validate_batch`] for `expected_total`.
///
/// Any failing record rejects the whole batch, so a partially valid batch
/// never reaches completion.
pub fn accept_batch(
    book: &AdaptorBook,
    payer_x: &[u8; 32],
    units: &[PaymentUnit],
    expected_total: u64,
    adaptor_point: &Secp256k1Point,
) -> Result<BTreeMap<UnitId, VerifiedAdaptor>, AdaptorError> {
    validate_batch(units, expected_total)?;

    let mut verified = BTreeMap::new();
    for unit in units {
        let id = unit.id();
        let record = book.get(&id).ok_or(AdaptorError::UnknownUnit(id))?;
        let token = accept_adaptor(record, payer_x, &unit.message_digest(), adaptor_point)?;
        verified.insert(id, token);
    }
    if let Some(extra) = book.keys().find(|id| !verified.contains_key(*id)) {
        return Err(AdaptorError::UnknownUnit(*extra));
    }

    info!(units = verified.len(), "batch accepted");
    Ok(verified)
}

/// Complete every accepted record with `hidden` and check each result.
pub fn complete_batch(
    verified: BTreeMap<UnitId, VerifiedAdaptor>,
    hidden: &Secp256k1Scalar,
) -> Result<BTreeMap<UnitId, CompletedSignature>, AdaptorError> {
    verified
        .into_iter()
        .map(|(id, token)| complete_checked(token, hidden).map(|sig| (id, sig)))
        .collect()
}
