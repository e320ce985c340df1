//! Adaptor points and adaptor records.
//!
//! The Signer publishes the nonce of a target signature ahead of time. From
//! that nonce, the Signer's key and the target digest, anyone can rebuild
//!
//! ```text
//! T = R_target + e * P_target,   e = H(R_target.x || P_target.x || m_target)
//! ```
//!
//! which equals `t * G` for the hidden second half `t` of the target signature.
//! Spend signatures locked to `T` complete only by revealing `t`.

use crate::challenge::compute_challenge;
use crate::error::AdaptorError;
use crate::scalar::{self, lift_x};
use crate::schnorr::{Signature, verify_signature};
use crypto_rs::secp256k1::{Secp256k1Point, Secp256k1Scalar};

/// Rebuild the adaptor point `T = R + e * P` from public target data.
///
/// Fails with [`AdaptorError::InvalidPoint`] if either x-coordinate does not lift.
pub fn build_adaptor_point(
    target_nonce_x: &[u8; 32],
    target_pubkey_x: &[u8; 32],
    target_digest: &[u8; 32],
) -> Result<Secp256k1Point, AdaptorError> {
    let e = compute_challenge(target_nonce_x, target_pubkey_x, target_digest);
    let r = lift_x(target_nonce_x)?;
    let p = lift_x(target_pubkey_x)?;
    let t = r + &(&p * &e);
    if scalar::is_identity(&t) {
        return Err(AdaptorError::PointAtInfinity);
    }
    Ok(t)
}

/// The public half of a target message signature, shared before the exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetCommitment {
    /// x-only nonce of the target signature.
    pub nonce_x: [u8; 32],
    /// x-only key the target signature verifies under.
    pub pubkey_x: [u8; 32],
    /// Digest of the target message.
    pub message_digest: [u8; 32],
}

impl TargetCommitment {
    /// Split a finished target signature into its public commitment and the hidden scalar.
    pub fn from_signature(
        signature: &Signature,
        pubkey_x: [u8; 32],
        message_digest: [u8; 32],
    ) -> (Self, Secp256k1Scalar) {
        let commitment = TargetCommitment {
            nonce_x: signature.nonce_x,
            pubkey_x,
            message_digest,
        };
        (commitment, signature.s.clone())
    }

    /// The adaptor point this commitment locks spend signatures to.
    pub fn adaptor_point(&self) -> Result<Secp256k1Point, AdaptorError> {
        build_adaptor_point(&self.nonce_x, &self.pubkey_x, &self.message_digest)
    }

    /// Put the target signature back together from a revealed scalar.
    pub fn assemble(&self, hidden: &Secp256k1Scalar) -> Signature {
        Signature {
            nonce_x: self.nonce_x,
            s: hidden.clone(),
        }
    }

    /// Assemble and check against the target key and digest.
    pub fn verify_assembled(&self, hidden: &Secp256k1Scalar) -> Result<Signature, AdaptorError> {
        let sig = self.assemble(hidden);
        if verify_signature(&sig, &self.message_digest, &self.pubkey_x) {
            Ok(sig)
        } else {
            Err(AdaptorError::ExtractedSignatureInvalid)
        }
    }
}

/// Pre-signature for one payment unit.
///
/// `s_a * G = R_p + c * P` with `c = H(R_a.x || P.x || m)` and `R_a = R_p + T`.
/// It is not a valid signature on its own.
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptorRecord {
    /// `s_a`.
    pub adaptor_scalar: Secp256k1Scalar,
    /// `R_p.x`, the payer's own nonce.
    pub payer_nonce_x: [u8; 32],
    /// `R_a.x`, the blinded nonce `R_p + T`.
    pub blinded_nonce_x: [u8; 32],
}

impl AdaptorRecord {
    /// Encoded length: `s_a || R_p.x || R_a.x`.
    pub const LEN: usize = 96;

    /// Fixed 96-byte encoding.
    pub fn to_bytes(&self) -> [u8; 96] {
        let mut out = [0u8; 96];
        out[..32].copy_from_slice(&scalar::to_bytes(&self.adaptor_scalar));
        out[32..64].copy_from_slice(&self.payer_nonce_x);
        out[64..].copy_from_slice(&self.blinded_nonce_x);
        out
    }

    /// Parse the 96-byte encoding. Nonces are checked later, at verification.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AdaptorError> {
        let arr = scalar::fixed::<96>(bytes)?;
        let adaptor_scalar = scalar::from_bytes(&arr[..32])?;
        let payer_nonce_x = scalar::fixed::<32>(&arr[32..64])?;
        let blinded_nonce_x = scalar::fixed::<32>(&arr[64..])?;
        Ok(AdaptorRecord {
            adaptor_scalar,
            payer_nonce_x,
            blinded_nonce_x,
        })
    }

    /// Hex of the 96-byte encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse from hex.
    pub fn from_hex(s: &str) -> Result<Self, AdaptorError> {
        Self::from_bytes(&hex::decode(s)?)
    }
}
