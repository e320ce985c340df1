//! Scalar and point bookkeeping over the secp256k1 group.
//!
//! Every scalar leaving this module is reduced mod `n`, and every point lifted
//! from an x-only encoding is the even-y lift. Byte encodings are fixed-width
//! 32-byte big-endian, zero-padded on the left.

use std::sync::LazyLock;

use crate::error::AdaptorError;
use crypto_rs::secp256k1::{Secp256k1Point, Secp256k1Scalar};
use num_bigint::BigUint;

// -1 is n - 1 in the scalar field.
static CURVE_ORDER: LazyLock<BigUint> =
    LazyLock::new(|| (-Secp256k1Scalar::one()).value() + 1u32);

/// The group order `n`.
pub fn curve_order() -> &'static BigUint {
    &CURVE_ORDER
}

/// Reduce a big-endian integer of any width mod `n`.
pub fn reduce(bytes: &[u8]) -> Secp256k1Scalar {
    Secp256k1Scalar::new(BigUint::from_bytes_be(bytes) % curve_order())
}

/// Fixed 32-byte big-endian encoding.
pub fn to_bytes(s: &Secp256k1Scalar) -> [u8; 32] {
    let reduced = s.value() % curve_order();
    let raw = reduced.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - raw.len()..].copy_from_slice(&raw);
    out
}

/// Parse a canonical 32-byte scalar. Values `>= n` are rejected, not reduced.
pub fn from_bytes(bytes: &[u8]) -> Result<Secp256k1Scalar, AdaptorError> {
    let arr = fixed::<32>(bytes)?;
    let value = BigUint::from_bytes_be(&arr);
    if &value >= curve_order() {
        return Err(AdaptorError::ScalarOutOfRange);
    }
    Ok(Secp256k1Scalar::new(value))
}

/// Parse a canonical scalar from 64 hex characters.
pub fn from_hex(s: &str) -> Result<Secp256k1Scalar, AdaptorError> {
    from_bytes(&hex::decode(s)?)
}

/// Hex encoding of the 32-byte scalar form.
pub fn to_hex(s: &Secp256k1Scalar) -> String {
    hex::encode(to_bytes(s))
}

/// Copy a slice into a fixed-width array, reporting the length on mismatch.
pub fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], AdaptorError> {
    bytes.try_into().map_err(|_| AdaptorError::WrongLength {
        expected: N,
        got: bytes.len(),
    })
}

/// Lift an x-only coordinate to the curve point with even y.
pub fn lift_x(x: &[u8; 32]) -> Result<Secp256k1Point, AdaptorError> {
    let mut compressed = [0u8; 33];
    compressed[0] = 0x02;
    compressed[1..].copy_from_slice(x);
    Secp256k1Point::from_bytes_compressed(&compressed).ok_or(AdaptorError::InvalidPoint)
}

/// x-only encoding of a point.
pub fn x_only(p: &Secp256k1Point) -> Result<[u8; 32], AdaptorError> {
    if is_identity(p) {
        return Err(AdaptorError::PointAtInfinity);
    }
    fixed::<32>(&p.x_only_bytes())
}

/// Whether `p` is the point at infinity.
pub fn is_identity(p: &Secp256k1Point) -> bool {
    *p == Secp256k1Point::identity()
}

/// `s * G`.
pub fn base_mul(s: &Secp256k1Scalar) -> Secp256k1Point {
    Secp256k1Point::generator() * s
}

/// Flip `(k, K)` to `(-k, -K)` when `K` has odd y, so the returned point has even y.
pub fn normalize_even_y(
    k: Secp256k1Scalar,
    point: Secp256k1Point,
) -> (Secp256k1Scalar, Secp256k1Point) {
    if point.y_is_odd() {
        (-k, -point)
    } else {
        (k, point)
    }
}
