//! Payment units and their identifiers.
//!
//! A payment unit is one value-bearing record whose spend condition is a
//! public-key lock. Its payload is opaque here; only its hash matters.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::AdaptorError;
use crypto_rs::schnorr::tagged_hash;
use sha2::{Digest, Sha256};

/// Tag for deriving unit identifiers from spend-condition payloads.
pub const UNIT_ID_TAG: &str = "adaptor-bridge/unit";

/// Stable identifier of a payment unit, derived from its spend condition.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub [u8; 32]);

impl UnitId {
    /// Derive the identifier for a spend-condition payload.
    pub fn derive(spend_condition: &[u8]) -> Self {
        UnitId(tagged_hash(UNIT_ID_TAG, spend_condition))
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({self})")
    }
}

/// One payment unit: an amount and its spend-condition payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentUnit {
    /// Value carried by the unit.
    pub amount: u64,
    /// Spend-condition payload. Its SHA-256 is the digest the spend signature signs.
    pub spend_condition: Vec<u8>,
}

impl PaymentUnit {
    /// New unit.
    pub fn new(amount: u64, spend_condition: impl Into<Vec<u8>>) -> Self {
        PaymentUnit {
            amount,
            spend_condition: spend_condition.into(),
        }
    }

    /// Identifier used to key adaptor records.
    pub fn id(&self) -> UnitId {
        UnitId::derive(&self.spend_condition)
    }

    /// Digest a spend signature for this unit must sign.
    pub fn message_digest(&self) -> [u8; 32] {
        Sha256::digest(&self.spend_condition).into()
    }
}

/// Check a batch before locking or accepting it.
///
/// Rejects an empty batch, a total that differs from `expected_total`, and any
/// two units with the same spend condition. Either failure alone is fatal.
pub fn validate_batch(units: &[PaymentUnit], expected_total: u64) -> Result<(), AdaptorError> {
    if units.is_empty() {
        return Err(AdaptorError::EmptyBatch);
    }

    let total = units
        .iter()
        .try_fold(0u64, |acc, u| acc.checked_add(u.amount))
        .unwrap_or(u64::MAX);
    if total != expected_total {
        return Err(AdaptorError::AmountMismatch {
            expected: expected_total,
            got: total,
        });
    }

    let mut seen = BTreeSet::new();
    for unit in units {
        let id = unit.id();
        if !seen.insert(id) {
            return Err(AdaptorError::DuplicateUnit(id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_stable_and_distinct() {
        let a = PaymentUnit::new(8, b"lock-a".to_vec());
        let b = PaymentUnit::new(8, b"lock-b".to_vec());
        assert_eq!(a.id(), PaymentUnit::new(1, b"lock-a".to_vec()).id());
        assert_ne!(a.id(), b.id());
        assert_ne!(a.id().0, a.message_digest(), "id and digest are domain separated");
    }

    #[test]
    fn display_is_hex() {
        let id = UnitId([0xAB; 32]);
        assert_eq!(id.to_string(), "ab".repeat(32));
    }

    #[test]
    fn valid_batch_passes() {
        let units = vec![PaymentUnit::new(4, "x"), PaymentUnit::new(2, "y")];
        assert_eq!(validate_batch(&units, 6), Ok(()));
    }

    #[test]
    fn empty_batch_fails() {
        assert_eq!(validate_batch(&[], 0), Err(AdaptorError::EmptyBatch));
    }

    #[test]
    fn amount_mismatch_alone_fails() {
        let units = vec![PaymentUnit::new(4, "x"), PaymentUnit::new(2, "y")];
        assert_eq!(
            validate_batch(&units, 7),
            Err(AdaptorError::AmountMismatch {
                expected: 7,
                got: 6
            })
        );
    }

    #[test]
    fn duplicate_alone_fails() {
        let units = vec![PaymentUnit::new(4, "x"), PaymentUnit::new(2, "x")];
        assert_eq!(
            validate_batch(&units, 6),
            Err(AdaptorError::DuplicateUnit(UnitId::derive(b"x")))
        );
    }

    #[test]
    fn overflowing_total_does_not_wrap() {
        let units = vec![PaymentUnit::new(u64::MAX, "x"), PaymentUnit::new(2, "y")];
        assert!(matches!(
            validate_batch(&units, 1),
            Err(AdaptorError::AmountMismatch { .. })
        ));
    }
}
