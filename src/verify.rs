//! Signer-side adaptor verification.
//!
//! Recomputes the spend challenge over the blinded nonce and checks the
//! pre-signature against the payer's own nonce. A successful check yields a
//! [`VerifiedAdaptor`], the only value completion accepts.

use crate::adaptor::AdaptorRecord;
use crate::challenge::compute_challenge;
use crate::error::AdaptorError;
use crate::scalar::{base_mul, lift_x};
use crypto_rs::secp256k1::Secp256k1Point;
use tracing::{debug, warn};

/// An adaptor record that passed [`accept_adaptor`] for a specific key and digest.
///
/// Has no public constructor, so holding one proves verification happened.
/// It is not `Clone`: completion consumes it, so each accepted record
/// completes once.
///
/// ```compile_fail
/// fn duplicate(token: &adaptor_bridge::VerifiedAdaptor) -> adaptor_bridge::VerifiedAdaptor {
///     token.clone()
/// }
/// ```
#[derive(Debug, PartialEq)]
pub struct VerifiedAdaptor {
    record: AdaptorRecord,
    pubkey_x: [u8; 32],
    message_digest: [u8; 32],
}

impl VerifiedAdaptor {
    /// The record that was verified.
    pub fn record(&self) -> &AdaptorRecord {
        &self.record
    }

    /// Key the completed signature will verify under.
    pub fn pubkey_x(&self) -> &[u8; 32] {
        &self.pubkey_x
    }

    /// Digest the completed signature will sign.
    pub fn message_digest(&self) -> &[u8; 32] {
        &self.message_digest
    }
}

/// Check an adaptor record against the payer key and spend digest.
///
/// Accepts when `s_a * G` equals `R_p + c * P` or `R_p + (n - c) * P`. The
/// verifier cannot tell which parity the payer's real key had, so both
/// challenge signs are tried. This is a two-way check, not a retry.
pub fn verify_adaptor(record: &AdaptorRecord, pubkey_x: &[u8; 32], msg: &[u8; 32]) -> bool {
    let Ok(r_p) = lift_x(&record.payer_nonce_x) else {
        return false;
    };
    let Ok(p) = lift_x(pubkey_x) else {
        return false;
    };
    // R_a must itself be a curve point for the completed signature to verify.
    if lift_x(&record.blinded_nonce_x).is_err() {
        return false;
    }

    let c = compute_challenge(&record.blinded_nonce_x, pubkey_x, msg);
    let lhs = base_mul(&record.adaptor_scalar);

    let even = r_p.clone() + &(&p * &c);
    if lhs == even {
        return true;
    }
    let odd = r_p + &(&p * &(-c));
    lhs == odd
}

/// Whether `R_a = R_p + T`, i.e. the record is blinded by this adaptor point.
pub fn is_blinded_by(record: &AdaptorRecord, adaptor_point: &Secp256k1Point) -> bool {
    match (
        lift_x(&record.payer_nonce_x),
        lift_x(&record.blinded_nonce_x),
    ) {
        (Ok(r_p), Ok(r_a)) => r_p + adaptor_point == r_a,
        _ => false,
    }
}

/// [`verify_adaptor`] plus the blinding check, returning the capability needed to complete.
///
/// Without the blinding check a payer could pick an unrelated `R_a`; the
/// completed signature would then fail at settlement while still exposing `t`.
pub fn accept_adaptor(
    record: &AdaptorRecord,
    pubkey_x: &[u8; 32],
    msg: &[u8; 32],
    adaptor_point: &Secp256k1Point,
) -> Result<VerifiedAdaptor, AdaptorError> {
    if !verify_adaptor(record, pubkey_x, msg) || !is_blinded_by(record, adaptor_point) {
        warn!(
            blinded_nonce = %hex::encode(record.blinded_nonce_x),
            "adaptor signature rejected"
        );
        return Err(AdaptorError::VerificationFailed);
    }
    debug!(
        blinded_nonce = %hex::encode(record.blinded_nonce_x),
        "adaptor signature verified"
    );
    Ok(VerifiedAdaptor {
        record: record.clone(),
        pubkey_x: *pubkey_x,
        message_digest: *msg,
    })
}
