// Per-unit progress through the exchange.
// Each payment unit moves Generated -> Shared -> Verified -> Completed -> Extracted,
// one step at a time. Nothing moves backwards and nothing skips a step.
use crate::error::AdaptorError;
use crate::unit::UnitId;
use std::collections::BTreeMap;
use tracing::debug;

/// Where a payment unit is in the exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitState {
    /// Payer produced the adaptor record.
    Generated,
    /// Record handed to the signer.
    Shared,
    /// Signer accepted the record.
    Verified,
    /// Signer completed and submitted the spend signature.
    Completed,
    /// Payer extracted the hidden scalar from the settled signature.
    Extracted,
}

impl UnitState {
    /// The only state this one may advance to.
    pub fn next(self) -> Option<UnitState> {
        match self {
            UnitState::Generated => Some(UnitState::Shared),
            UnitState::Shared => Some(UnitState::Verified),
            UnitState::Verified => Some(UnitState::Completed),
            UnitState::Completed => Some(UnitState::Extracted),
            UnitState::Extracted => None,
        }
    }
}

/// Tracks [`UnitState`] per unit.
#[derive(Debug, Default, Clone)]
pub struct UnitLedger {
    states: BTreeMap<UnitId, UnitState>,
}

impl UnitLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a unit in [`UnitState::Generated`].
    pub fn register(&mut self, id: UnitId) -> Result<(), AdaptorError> {
        if self.states.contains_key(&id) {
            return Err(AdaptorError::DuplicateUnit(id));
        }
        self.states.insert(id, UnitState::Generated);
        Ok(())
    }

    /// Move a unit to `to`, which must be its immediate successor.
    pub fn advance(&mut self, id: &UnitId, to: UnitState) -> Result<(), AdaptorError> {
        let from = *self.states.get(id).ok_or(AdaptorError::UnknownUnit(*id))?;
        if from.next() != Some(to) {
            return Err(AdaptorError::InvalidTransition {
                unit: *id,
                from,
                to,
            });
        }
        debug!(unit = %id, ?from, ?to, "unit advanced");
        self.states.insert(*id, to);
        Ok(())
    }

    /// Advance every tracked unit that is in `from`.
    pub fn advance_all(&mut self, from: UnitState, to: UnitState) -> Result<usize, AdaptorError> {
        let ids: Vec<UnitId> = self
            .states
            .iter()
            .filter(|(_, s)| **s == from)
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            self.advance(id, to)?;
        }
        Ok(ids.len())
    }

    /// Current state of a unit.
    pub fn state(&self, id: &UnitId) -> Option<UnitState> {
        self.states.get(id).copied()
    }

    /// Number of tracked units.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no units are tracked.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(b: u8) -> UnitId {
        UnitId([b; 32])
    }

    #[test]
    fn full_forward_path() {
        let mut ledger = UnitLedger::new();
        ledger.register(id(1)).unwrap();
        for to in [
            UnitState::Shared,
            UnitState::Verified,
            UnitState::Completed,
            UnitState::Extracted,
        ] {
            ledger.advance(&id(1), to).unwrap();
            assert_eq!(ledger.state(&id(1)), Some(to));
        }
        assert_eq!(UnitState::Extracted.next(), None);
    }

    #[test]
    fn cannot_skip_verification() {
        let mut ledger = UnitLedger::new();
        ledger.register(id(1)).unwrap();
        ledger.advance(&id(1), UnitState::Shared).unwrap();
        assert_eq!(
            ledger.advance(&id(1), UnitState::Completed),
            Err(AdaptorError::InvalidTransition {
                unit: id(1),
                from: UnitState::Shared,
                to: UnitState::Completed,
            })
        );
    }

    #[test]
    fn cannot_go_back() {
        let mut ledger = UnitLedger::new();
        ledger.register(id(1)).unwrap();
        ledger.advance(&id(1), UnitState::Shared).unwrap();
        assert!(ledger.advance(&id(1), UnitState::Generated).is_err());
        assert!(ledger.advance(&id(1), UnitState::Shared).is_err());
    }

    #[test]
    fn unknown_and_duplicate() {
        let mut ledger = UnitLedger::new();
        assert_eq!(
            ledger.advance(&id(9), UnitState::Shared),
            Err(AdaptorError::UnknownUnit(id(9)))
        );
        ledger.register(id(9)).unwrap();
        assert_eq!(ledger.register(id(9)), Err(AdaptorError::DuplicateUnit(id(9))));
    }

    #[test]
    fn advance_all_moves_matching_units() {
        let mut ledger = UnitLedger::new();
        ledger.register(id(1)).unwrap();
        ledger.register(id(2)).unwrap();
        ledger.register(id(3)).unwrap();
        ledger.advance(&id(3), UnitState::Shared).unwrap();
        assert_eq!(
            ledger.advance_all(UnitState::Generated, UnitState::Shared),
            Ok(2)
        );
        assert_eq!(ledger.len(), 3);
        assert!(
            [id(1), id(2), id(3)]
                .iter()
                .all(|u| ledger.state(u) == Some(UnitState::Shared))
        );
    }
}
