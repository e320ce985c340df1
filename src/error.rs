use crate::nonce::NonceError;
use crate::session::UnitState;
use crate::unit::UnitId;
use thiserror::Error;

/// Errors that can occur while building, checking, completing or settling adaptor signatures.
#[derive(Debug, Error, PartialEq)]
pub enum AdaptorError {
    /// An x-coordinate did not lift to a point on the curve.
    #[error("invalid point: x-coordinate is not on the curve")]
    InvalidPoint,

    /// A computed point was the identity, which has no x-only encoding.
    #[error("point at infinity")]
    PointAtInfinity,

    /// A fixed-width byte field had the wrong length.
    #[error("wrong length: expected {expected} bytes, got {got}")]
    WrongLength {
        /// Required length in bytes.
        expected: usize,
        /// Length actually supplied.
        got: usize,
    },

    /// A 32-byte scalar encoding was not below the group order.
    #[error("scalar out of range")]
    ScalarOutOfRange,

    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// A nonce could not be drawn from the random source.
    #[error("nonce error: {0}")]
    Nonce(#[from] NonceError),

    /// No blinded nonce with even y was found within the retry cap.
    #[error("no even-y blinded nonce after {attempts} attempts")]
    NonceRetriesExhausted {
        /// Number of nonces tried.
        attempts: usize,
    },

    /// Neither parity branch of the adaptor relation held.
    #[error("adaptor signature verification failed")]
    VerificationFailed,

    /// A completed spend signature does not verify, so the hidden scalar does not match `T`.
    #[error("completed signature does not verify")]
    CompletionInvalid,

    /// A completed signature does not carry the blinded nonce of the record it is paired with.
    #[error("completed signature nonce does not match the adaptor record")]
    NonceMismatch,

    /// The target signature rebuilt from an extracted scalar does not verify.
    #[error("extracted target signature does not verify")]
    ExtractedSignatureInvalid,

    /// A batch contained no payment units.
    #[error("empty batch")]
    EmptyBatch,

    /// Unit amounts do not add up to the expected total.
    #[error("batch total {got} does not match expected {expected}")]
    AmountMismatch {
        /// Total the caller expected.
        expected: u64,
        /// Total actually carried by the units.
        got: u64,
    },

    /// Two units in one batch share a spend-condition payload.
    #[error("duplicate payment unit {0}")]
    DuplicateUnit(UnitId),

    /// A unit identifier was not found where it was required.
    #[error("unknown payment unit {0}")]
    UnknownUnit(UnitId),

    /// A unit was redeemed twice.
    #[error("payment unit {0} already spent")]
    AlreadySpent(UnitId),

    /// A redemption witness does not verify against the unit's lock.
    #[error("invalid spend witness for unit {0}")]
    InvalidWitness(UnitId),

    /// A ledger transition skipped a state or went backwards.
    #[error("invalid transition for unit {unit}: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Unit whose state was being advanced.
        unit: UnitId,
        /// State the unit is in.
        from: UnitState,
        /// State that was requested.
        to: UnitState,
    },

    /// Configuration could not be loaded or is out of bounds.
    #[error("invalid config: {0}")]
    Config(String),
}
