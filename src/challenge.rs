//! Challenge computation for BIP340-style Schnorr relations.
//!
//! This module computes the challenge scalar
//!
//! ```text
//! e = H_tag("BIP0340/challenge", R.x || P.x || m) mod n
//! ```
//!
//! The adaptor pre-signature, the completed spend signature and the target
//! message signature all share this tag, so a completed signature verifies
//! under any standard BIP340 verifier.

use crate::scalar::reduce;
use crypto_rs::schnorr::tagged_hash;
use crypto_rs::secp256k1::Secp256k1Scalar;

/// Domain-separation tag for Schnorr challenges.
pub const CHALLENGE_TAG: &str = "BIP0340/challenge";

/// Compute `e = H_tag(nonce_x || pubkey_x || msg)`, reduced mod n.
///
/// All three inputs are fixed 32-byte encodings; the nonce and key are x-only.
pub fn compute_challenge(
    nonce_x: &[u8; 32],
    pubkey_x: &[u8; 32],
    msg: &[u8; 32],
) -> Secp256k1Scalar {
    compute_challenge_tagged(CHALLENGE_TAG, nonce_x, pubkey_x, msg)
}

/// Same as [`compute_challenge`] under an explicit tag.
///
/// Both parties must agree on the tag; a different tag yields an unrelated
/// challenge and every verification against it fails.
pub fn compute_challenge_tagged(
    tag: &str,
    nonce_x: &[u8; 32],
    pubkey_x: &[u8; 32],
    msg: &[u8; 32],
) -> Secp256k1Scalar {
    let mut buf = [0u8; 96];
    buf[..32].copy_from_slice(nonce_x);
    buf[32..64].copy_from_slice(pubkey_x);
    buf[64..].copy_from_slice(msg);
    reduce(&tagged_hash(tag, &buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    #[test]
    fn challenge_is_deterministic() {
        let e1 = compute_challenge(&[1u8; 32], &[2u8; 32], &[3u8; 32]);
        let e2 = compute_challenge(&[1u8; 32], &[2u8; 32], &[3u8; 32]);
        assert_eq!(e1, e2, "Challenge must be deterministic");
    }

    #[test]
    fn challenge_varies_with_each_input() {
        let base = compute_challenge(&[1u8; 32], &[2u8; 32], &[3u8; 32]);
        assert_ne!(base, compute_challenge(&[9u8; 32], &[2u8; 32], &[3u8; 32]));
        assert_ne!(base, compute_challenge(&[1u8; 32], &[9u8; 32], &[3u8; 32]));
        assert_ne!(base, compute_challenge(&[1u8; 32], &[2u8; 32], &[9u8; 32]));
    }

    #[test]
    fn tag_mismatch_changes_challenge() {
        let e1 = compute_challenge(&[1u8; 32], &[2u8; 32], &[3u8; 32]);
        let e2 = compute_challenge_tagged("Other/challenge", &[1u8; 32], &[2u8; 32], &[3u8; 32]);
        assert_ne!(e1, e2, "Different tags must not interoperate");
    }

    #[test]
    fn tagged_hash_is_not_plain_sha256() {
        let data = [7u8; 32];
        let plain: [u8; 32] = Sha256::digest(data).into();
        assert_ne!(tagged_hash(CHALLENGE_TAG, &data), plain);
    }

    #[test]
    fn tagged_hash_matches_manual_construction() {
        let tag = Sha256::digest(b"BIP0340/challenge");
        let mut manual = Vec::new();
        manual.extend_from_slice(&tag);
        manual.extend_from_slice(&tag);
        manual.extend_from_slice(b"payload");
        let expected: [u8; 32] = Sha256::digest(&manual).into();
        assert_eq!(tagged_hash(CHALLENGE_TAG, b"payload"), expected);
    }
}
