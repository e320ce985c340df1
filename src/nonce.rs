//! Nonce generation for Schnorr and adaptor signatures.
//!
//! This module implements both random and deterministic (HMAC-SHA256) nonce
//! creation. Every nonce leaves this module normalized to an even-y public
//! point: when `k * G` has odd y, the scalar is negated and the point reflected.
//!
//! A `NonceCommitment` is single use. It is deliberately not `Clone`, and the
//! signing paths consume it by value.

use crate::scalar::{base_mul, curve_order, normalize_even_y, reduce, to_bytes};
use crypto_rs::secp256k1::{Secp256k1Point, Secp256k1Scalar};
use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use thiserror::Error;

/// How many 32-byte draws a single random nonce may consume before giving up.
pub const MAX_SCALAR_DRAWS: usize = 5;

/// Errors for nonce operations
#[derive(Debug, Error, PartialEq)]
pub enum NonceError {
    /// Every draw was zero or not below the group order.
    #[error("random source produced no usable scalar after {0} draws")]
    DegenerateRandomness(usize),
}

/// Uniform scalar in `[1, n)`.
///
/// Draws are rejected (not reduced) when zero or `>= n`. Gives up after
/// [`MAX_SCALAR_DRAWS`] rejected draws.
pub(crate) fn random_scalar<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
) -> Result<Secp256k1Scalar, NonceError> {
    for _ in 0..MAX_SCALAR_DRAWS {
        let mut buf = [0u8; 32];
        rng.fill_bytes(&mut buf);
        let k = BigUint::from_bytes_be(&buf);
        if k.is_zero() || &k >= curve_order() {
            continue;
        }
        return Ok(Secp256k1Scalar::new(k));
    }
    Err(NonceError::DegenerateRandomness(MAX_SCALAR_DRAWS))
}

/// A secret nonce scalar with its even-y public point.
pub struct NonceCommitment {
    /// Secret scalar `k`, already negated if needed.
    secret: Secp256k1Scalar,
    /// Public nonce point `R = k * G`, always even y.
    point: Secp256k1Point,
}

impl std::fmt::Debug for NonceCommitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceCommitment")
            .field("point", &self.point)
            .finish_non_exhaustive()
    }
}

impl NonceCommitment {
    fn from_secret(k: Secp256k1Scalar) -> Self {
        let (secret, point) = normalize_even_y(k.clone(), base_mul(&k));
        NonceCommitment { secret, point }
    }

    /// Produce a fresh random nonce.
    pub fn random<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<Self, NonceError> {
        Ok(Self::from_secret(random_scalar(rng)?))
    }

    /// Derive a deterministic nonce via HMAC-SHA256(sk, msg), with fallback to avoid zero.
    pub fn deterministic(sk: &Secp256k1Scalar, msg: &[u8]) -> Self {
        type HmacSha256 = Hmac<Sha256>;
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&to_bytes(sk))
            .expect("HMAC can accept key of any length");
        mac.update(msg);
        let out = mac.finalize().into_bytes();
        let mut k = reduce(&out);
        if k.value().is_zero() {
            k = Secp256k1Scalar::one();
        }
        Self::from_secret(k)
    }

    /// The public nonce point.
    pub fn point(&self) -> &Secp256k1Point {
        &self.point
    }

    /// Give up the secret scalar, consuming the nonce.
    pub(crate) fn into_secret(self) -> Secp256k1Scalar {
        self.secret
    }
}
