//! Completion (Signer) and extraction (Payer).
//!
//! ```text
//! s_c = s_a + t        (complete_adaptor)
//! t   = s_c - s_a      (extract_secret)
//! ```

use crate::adaptor::{AdaptorRecord, TargetCommitment};
use crate::error::AdaptorError;
use crate::schnorr::{Signature, verify_signature};
use crate::verify::VerifiedAdaptor;
use crypto_rs::secp256k1::Secp256k1Scalar;
use tracing::debug;

/// A spend signature `(R_a.x, s_c)`; a plain Schnorr signature once `t` is right.
pub type CompletedSignature = Signature;

/// Add the hidden scalar to a verified pre-signature.
///
/// Consumes the verification token, so each accepted record completes once.
/// The result is only a valid signature if `t` is the scalar behind the
/// adaptor point; see [`check_completed`].
pub fn complete_adaptor(verified: VerifiedAdaptor, hidden: &Secp256k1Scalar) -> CompletedSignature {
    let record = verified.record();
    let s = record.adaptor_scalar.clone() + hidden;
    debug!(
        blinded_nonce = %hex::encode(record.blinded_nonce_x),
        "adaptor signature completed"
    );
    Signature {
        nonce_x: record.blinded_nonce_x,
        s,
    }
}

/// Complete and confirm the result verifies under the payer key and spend digest.
pub fn complete_checked(
    verified: VerifiedAdaptor,
    hidden: &Secp256k1Scalar,
) -> Result<CompletedSignature, AdaptorError> {
    let pubkey_x = *verified.pubkey_x();
    let digest = *verified.message_digest();
    let completed = complete_adaptor(verified, hidden);
    check_completed(&completed, &digest, &pubkey_x)?;
    Ok(completed)
}

/// Standard signature check on a completed spend signature.
pub fn check_completed(
    completed: &CompletedSignature,
    digest: &[u8; 32],
    pubkey_x: &[u8; 32],
) -> Result<(), AdaptorError> {
    if verify_signature(completed, digest, pubkey_x) {
        Ok(())
    } else {
        Err(AdaptorError::CompletionInvalid)
    }
}

/// Recover `t = s_c - s_a` from an observed spend signature.
///
/// The signature must carry the record's blinded nonce.
pub fn extract_secret(
    completed: &CompletedSignature,
    record: &AdaptorRecord,
) -> Result<Secp256k1Scalar, AdaptorError> {
    if completed.nonce_x != record.blinded_nonce_x {
        return Err(AdaptorError::NonceMismatch);
    }
    Ok(completed.s.clone() + &(-record.adaptor_scalar.clone()))
}

/// Extract `t`, rebuild the target signature and verify it before returning it.
pub fn recover_target_signature(
    completed: &CompletedSignature,
    record: &AdaptorRecord,
    target: &TargetCommitment,
) -> Result<Signature, AdaptorError> {
    let t = extract_secret(completed, record)?;
    let sig = target.verify_assembled(&t)?;
    debug!(
        target_nonce = %hex::encode(target.nonce_x),
        "target signature recovered"
    );
    Ok(sig)
}
