//! Key pairs with BIP340 parity handling.

use crate::error::AdaptorError;
use crate::nonce::random_scalar;
use crate::scalar::{self, base_mul, x_only};
use crypto_rs::secp256k1::{Secp256k1Point, Secp256k1Scalar};
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

/// A secret scalar and its public point `P = k * G`.
///
/// The public point keeps its true parity. Code that needs the x-only
/// convention asks for [`KeyPair::signing_scalar`], which returns a negated
/// copy when `P` has odd y; the pair itself is never mutated.
#[derive(Clone)]
pub struct KeyPair {
    secret: Secp256k1Scalar,
    public: Secp256k1Point,
    public_x: [u8; 32],
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

impl KeyPair {
    /// Build a key pair from a canonical 32-byte secret. Zero is rejected.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, AdaptorError> {
        let secret = scalar::from_bytes(bytes)?;
        Self::from_scalar(secret)
    }

    /// Build a key pair from 64 hex characters.
    pub fn from_secret_hex(s: &str) -> Result<Self, AdaptorError> {
        Self::from_secret_bytes(&hex::decode(s)?)
    }

    /// Build a key pair from a scalar. Zero is rejected.
    pub fn from_scalar(secret: Secp256k1Scalar) -> Result<Self, AdaptorError> {
        if secret.value().is_zero() {
            return Err(AdaptorError::ScalarOutOfRange);
        }
        let public = base_mul(&secret);
        let public_x = x_only(&public)?;
        Ok(KeyPair {
            secret,
            public,
            public_x,
        })
    }

    /// Draw a fresh random key pair. Either parity is possible.
    pub fn random<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<Self, AdaptorError> {
        Self::from_scalar(random_scalar(rng)?)
    }

    /// The secret scalar as given.
    pub fn secret(&self) -> &Secp256k1Scalar {
        &self.secret
    }

    /// The public point with its true parity.
    pub fn public(&self) -> &Secp256k1Point {
        &self.public
    }

    /// Whether the public point has odd y.
    pub fn has_odd_y(&self) -> bool {
        self.public.y_is_odd()
    }

    /// x-only public key.
    pub fn public_x(&self) -> [u8; 32] {
        self.public_x
    }

    /// Secret matching the even-y lift of [`KeyPair::public_x`].
    pub fn signing_scalar(&self) -> Secp256k1Scalar {
        if self.has_odd_y() {
            -self.secret.clone()
        } else {
            self.secret.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{lift_x, to_bytes};

    #[test]
    fn signing_scalar_matches_even_lift() {
        for b in 1..=24u8 {
            let kp = KeyPair::from_secret_bytes(&[b; 32]).unwrap();
            let lifted = lift_x(&kp.public_x()).unwrap();
            assert_eq!(base_mul(&kp.signing_scalar()), lifted);
        }
    }

    #[test]
    fn normalization_does_not_touch_the_pair() {
        let kp = (1..=64u8)
            .map(|b| KeyPair::from_secret_bytes(&[b; 32]).unwrap())
            .find(KeyPair::has_odd_y)
            .expect("some key has odd y");
        let before = to_bytes(kp.secret());
        let _ = kp.signing_scalar();
        assert_eq!(to_bytes(kp.secret()), before);
        assert!(kp.public().y_is_odd());
    }

    #[test]
    fn stored_x_matches_public_point() {
        for b in 1..=8u8 {
            let kp = KeyPair::from_secret_bytes(&[b; 32]).unwrap();
            assert_eq!(kp.public_x(), x_only(kp.public()).unwrap());
            assert_ne!(kp.public_x(), [0u8; 32]);
        }
    }

    #[test]
    fn zero_secret_is_rejected() {
        assert_eq!(
            KeyPair::from_secret_bytes(&[0u8; 32]).unwrap_err(),
            AdaptorError::ScalarOutOfRange
        );
    }

    #[test]
    fn known_public_key() {
        // Secret 3 has x-only key F9308A01...
        let mut sk = [0u8; 32];
        sk[31] = 3;
        let kp = KeyPair::from_secret_bytes(&sk).unwrap();
        assert_eq!(
            hex::encode(kp.public_x()),
            "f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9"
        );
    }
}
