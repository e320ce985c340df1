//! Settlement of payment units.
//!
//! [`SettlementObserver`] is what the payer polls to learn that a unit was
//! spent and which signature spent it. [`InMemoryMint`] is a reference
//! implementation that locks units to x-only keys and only accepts valid
//! spend signatures.

use std::collections::HashMap;

use crate::error::AdaptorError;
use crate::schnorr::{Signature, verify_signature};
use crate::unit::{PaymentUnit, UnitId};
use tracing::{debug, info, warn};

/// Settlement state of one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    /// Still locked.
    Unspent,
    /// Spent. `witness` is the 64-byte spend signature, when the settler exposes it.
    Spent {
        /// Signature attached to the spend.
        witness: Option<[u8; 64]>,
    },
}

/// Reports settlement state per unit.
pub trait SettlementObserver {
    /// `None` if the unit is unknown to this observer.
    fn settlement(&self, id: &UnitId) -> Option<Settlement>;
}

#[derive(Debug)]
struct LockedUnit {
    unit: PaymentUnit,
    lock_x: [u8; 32],
    witness: Option<[u8; 64]>,
}

/// In-memory settler for units locked to x-only keys.
#[derive(Debug, Default)]
pub struct InMemoryMint {
    units: HashMap<UnitId, LockedUnit>,
}

impl InMemoryMint {
    /// Empty mint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock `unit` to `lock_x`. Issuing the same spend condition twice fails.
    pub fn issue(&mut self, unit: PaymentUnit, lock_x: [u8; 32]) -> Result<UnitId, AdaptorError> {
        let id = unit.id();
        if self.units.contains_key(&id) {
            return Err(AdaptorError::DuplicateUnit(id));
        }
        debug!(unit = %id, amount = unit.amount, "unit issued");
        self.units.insert(
            id,
            LockedUnit {
                unit,
                lock_x,
                witness: None,
            },
        );
        Ok(id)
    }

    /// Spend a unit with a signature over its digest under its lock key.
    pub fn redeem(&mut self, id: &UnitId, witness: &Signature) -> Result<u64, AdaptorError> {
        let locked = self
            .units
            .get_mut(id)
            .ok_or(AdaptorError::UnknownUnit(*id))?;
        if locked.witness.is_some() {
            return Err(AdaptorError::AlreadySpent(*id));
        }
        if !verify_signature(witness, &locked.unit.message_digest(), &locked.lock_x) {
            warn!(unit = %id, "redeem rejected: invalid witness");
            return Err(AdaptorError::InvalidWitness(*id));
        }
        locked.witness = Some(witness.to_bytes());
        info!(unit = %id, amount = locked.unit.amount, "unit redeemed");
        Ok(locked.unit.amount)
    }
}

impl SettlementObserver for InMemoryMint {
    fn settlement(&self, id: &UnitId) -> Option<Settlement> {
        self.units.get(id).map(|locked| match locked.witness {
            None => Settlement::Unspent,
            Some(witness) => Settlement::Spent {
                witness: Some(witness),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;
    use crate::schnorr::sign;

    fn fixture() -> (InMemoryMint, KeyPair, PaymentUnit, UnitId) {
        let mut mint = InMemoryMint::new();
        let key = KeyPair::from_secret_bytes(&[0x21; 32]).unwrap();
        let unit = PaymentUnit::new(16, b"lock".to_vec());
        let id = mint.issue(unit.clone(), key.public_x()).unwrap();
        (mint, key, unit, id)
    }

    #[test]
    fn redeem_with_valid_witness() {
        let (mut mint, key, unit, id) = fixture();
        assert_eq!(mint.settlement(&id), Some(Settlement::Unspent));
        let sig = sign(&key, &unit.message_digest()).unwrap();
        assert_eq!(mint.redeem(&id, &sig), Ok(16));
        assert_eq!(
            mint.settlement(&id),
            Some(Settlement::Spent {
                witness: Some(sig.to_bytes())
            })
        );
    }

    #[test]
    fn double_spend_is_refused() {
        let (mut mint, key, unit, id) = fixture();
        let sig = sign(&key, &unit.message_digest()).unwrap();
        mint.redeem(&id, &sig).unwrap();
        assert_eq!(mint.redeem(&id, &sig), Err(AdaptorError::AlreadySpent(id)));
    }

    #[test]
    fn wrong_key_is_refused() {
        let (mut mint, _, unit, id) = fixture();
        let other = KeyPair::from_secret_bytes(&[0x22; 32]).unwrap();
        let sig = sign(&other, &unit.message_digest()).unwrap();
        assert_eq!(mint.redeem(&id, &sig), Err(AdaptorError::InvalidWitness(id)));
        assert_eq!(mint.settlement(&id), Some(Settlement::Unspent));
    }

    #[test]
    fn unknown_and_duplicate_units() {
        let (mut mint, key, unit, id) = fixture();
        let ghost = UnitId([0u8; 32]);
        assert_eq!(mint.settlement(&ghost), None);
        let sig = sign(&key, &unit.message_digest()).unwrap();
        assert_eq!(mint.redeem(&ghost, &sig), Err(AdaptorError::UnknownUnit(ghost)));
        assert_eq!(
            mint.issue(unit, key.public_x()),
            Err(AdaptorError::DuplicateUnit(id))
        );
    }
}
