//! BIP340 Schnorr signatures over 32-byte digests.
//!
//! This is the message-signing side of the bridge: the Signer's target
//! signature, and the standard check every completed spend signature must pass.

use crate::challenge::compute_challenge;
use crate::error::AdaptorError;
use crate::keys::KeyPair;
use crate::nonce::NonceCommitment;
use crate::scalar::{self, lift_x, x_only};
use crypto_rs::schnorr::schnorr_verify;
use crypto_rs::secp256k1::Secp256k1Scalar;

/// A Schnorr signature `(R.x, s)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    /// x-only public nonce.
    pub nonce_x: [u8; 32],
    /// Signature scalar.
    pub s: Secp256k1Scalar,
}

impl Signature {
    /// `R.x || s`, 64 bytes.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.nonce_x);
        out[32..].copy_from_slice(&scalar::to_bytes(&self.s));
        out
    }

    /// Parse 64 bytes. The nonce is not checked against the curve here; `s` must be below n.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AdaptorError> {
        let arr = scalar::fixed::<64>(bytes)?;
        let mut nonce_x = [0u8; 32];
        nonce_x.copy_from_slice(&arr[..32]);
        let s = scalar::from_bytes(&arr[32..])?;
        Ok(Signature { nonce_x, s })
    }

    /// Hex of the 64-byte encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

/// Something that holds a key and can sign 32-byte digests.
pub trait MessageSigner {
    /// x-only public key the signatures verify under.
    fn public_key_x(&self) -> [u8; 32];

    /// Sign a 32-byte digest.
    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Signature, AdaptorError>;
}

impl MessageSigner for KeyPair {
    fn public_key_x(&self) -> [u8; 32] {
        self.public_x()
    }

    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Signature, AdaptorError> {
        sign(self, digest)
    }
}

/// Sign `digest` under `key` with a deterministic nonce.
///
/// `s = k + e * d` where `d` is the parity-normalized secret and
/// `e = H(R.x || P.x || m)`.
pub fn sign(key: &KeyPair, digest: &[u8; 32]) -> Result<Signature, AdaptorError> {
    let d = key.signing_scalar();
    let mut nonce_input = Vec::with_capacity(64);
    nonce_input.extend_from_slice(&key.public_x());
    nonce_input.extend_from_slice(digest);
    let nonce = NonceCommitment::deterministic(&d, &nonce_input);
    let nonce_x = x_only(nonce.point())?;

    let e = compute_challenge(&nonce_x, &key.public_x(), digest);
    let s = nonce.into_secret() + &(e * &d);
    Ok(Signature { nonce_x, s })
}

/// Verify a 64-byte signature over `digest` under an x-only key.
///
/// Malformed input (bad key, out-of-range scalar) is a failed verification.
pub fn verify(signature: &[u8; 64], digest: &[u8; 32], pubkey_x: &[u8; 32]) -> bool {
    match Signature::from_bytes(signature) {
        Ok(sig) => verify_signature(&sig, digest, pubkey_x),
        Err(_) => false,
    }
}

/// Typed form of [`verify`], checked by the curve crate's BIP340 verifier.
///
/// A key that does not lift to the curve fails without reaching the verifier.
pub fn verify_signature(sig: &Signature, digest: &[u8; 32], pubkey_x: &[u8; 32]) -> bool {
    if lift_x(pubkey_x).is_err() {
        return false;
    }
    schnorr_verify(pubkey_x, digest, &sig.to_bytes())
}
