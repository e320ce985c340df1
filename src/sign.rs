//! Payer-side adaptor signing:
//! - `generate_adaptor`: pre-sign one spend digest against an adaptor point
//! - `generate_adaptor_with`: same, with an explicit RNG and retry cap

use crate::adaptor::AdaptorRecord;
use crate::challenge::compute_challenge;
use crate::error::AdaptorError;
use crate::keys::KeyPair;
use crate::nonce::NonceCommitment;
use crate::scalar::{is_identity, x_only};
use crypto_rs::secp256k1::Secp256k1Point;
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// Default cap on blinded-nonce attempts. Each attempt succeeds with probability 1/2.
pub const MAX_NONCE_ATTEMPTS: usize = 64;

/// Pre-sign `msg` under `key`, locked to `adaptor_point`, using the thread RNG.
pub fn generate_adaptor(
    key: &KeyPair,
    adaptor_point: &Secp256k1Point,
    msg: &[u8; 32],
) -> Result<AdaptorRecord, AdaptorError> {
    generate_adaptor_with(&mut rand::rng(), MAX_NONCE_ATTEMPTS, key, adaptor_point, msg)
}

/// Pre-sign `msg` under `key`, locked to `adaptor_point`.
///
/// 1. Draw an even-y nonce `(r, R)` and set `R_a = R + T`, redrawing while
///    `R_a` has odd y (at most `max_attempts` draws).
/// 2. `c = H(R_a.x || P.x || m)`, negated when the true key has odd y.
/// 3. `s_a = r + c' * k`.
///
/// Every call draws its own nonce, so units sharing `key` never share one.
pub fn generate_adaptor_with<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    max_attempts: usize,
    key: &KeyPair,
    adaptor_point: &Secp256k1Point,
    msg: &[u8; 32],
) -> Result<AdaptorRecord, AdaptorError> {
    let pubkey_x = key.public_x();

    for attempt in 1..=max_attempts {
        let nonce = NonceCommitment::random(rng)?;
        let blinded = nonce.point().clone() + adaptor_point;
        if is_identity(&blinded) || blinded.y_is_odd() {
            continue;
        }

        let payer_nonce_x = x_only(nonce.point())?;
        let blinded_nonce_x = x_only(&blinded)?;

        let c = compute_challenge(&blinded_nonce_x, &pubkey_x, msg);
        let c = if key.has_odd_y() { -c } else { c };
        let adaptor_scalar = nonce.into_secret() + &(c * key.secret());

        debug!(
            attempt,
            blinded_nonce = %hex::encode(blinded_nonce_x),
            "adaptor signature generated"
        );
        return Ok(AdaptorRecord {
            adaptor_scalar,
            payer_nonce_x,
            blinded_nonce_x,
        });
    }

    Err(AdaptorError::NonceRetriesExhausted {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{base_mul, lift_x};
    use crypto_rs::secp256k1::Secp256k1Scalar;
    use num_bigint::BigUint;

    struct ConstRng(u8);

    impl RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            u32::from_be_bytes([self.0; 4])
        }
        fn next_u64(&mut self) -> u64 {
            u64::from_be_bytes([self.0; 8])
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(self.0);
        }
    }

    impl CryptoRng for ConstRng {}

    fn point(v: u64) -> Secp256k1Point {
        base_mul(&Secp256k1Scalar::new(BigUint::from(v)))
    }

    #[test]
    fn blinded_nonce_is_payer_nonce_plus_t() {
        let key = KeyPair::from_secret_bytes(&[1u8; 32]).unwrap();
        let t = point(99);
        for _ in 0..8 {
            let rec = generate_adaptor(&key, &t, &[5u8; 32]).unwrap();
            let r_p = lift_x(&rec.payer_nonce_x).unwrap();
            let r_a = lift_x(&rec.blinded_nonce_x).unwrap();
            assert_eq!(r_p + &t, r_a);
        }
    }

    #[test]
    fn nonces_differ_across_units() {
        let key = KeyPair::from_secret_bytes(&[1u8; 32]).unwrap();
        let t = point(7);
        let a = generate_adaptor(&key, &t, &[5u8; 32]).unwrap();
        let b = generate_adaptor(&key, &t, &[5u8; 32]).unwrap();
        assert_ne!(a.payer_nonce_x, b.payer_nonce_x);
        assert_ne!(a.adaptor_scalar, b.adaptor_scalar);
    }

    #[test]
    fn stuck_random_source_hits_the_cap() {
        let key = KeyPair::from_secret_bytes(&[1u8; 32]).unwrap();
        // A constant source yields the same nonce every time; pick T so R + T is odd.
        let r = NonceCommitment::random(&mut ConstRng(7)).unwrap().point().clone();
        let t = (1u64..256)
            .map(point)
            .find(|t| {
                let sum = r.clone() + t;
                !is_identity(&sum) && sum.y_is_odd()
            })
            .expect("some T gives an odd sum");
        let err = generate_adaptor_with(&mut ConstRng(7), 64, &key, &t, &[5u8; 32]).unwrap_err();
        assert_eq!(err, AdaptorError::NonceRetriesExhausted { attempts: 64 });
    }

    #[test]
    fn zero_random_source_is_fatal() {
        let key = KeyPair::from_secret_bytes(&[1u8; 32]).unwrap();
        let err = generate_adaptor_with(&mut ConstRng(0), 64, &key, &point(3), &[5u8; 32])
            .unwrap_err();
        assert!(matches!(err, AdaptorError::Nonce(_)));
    }
}
