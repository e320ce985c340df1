//! Schnorr adaptor signatures over secp256k1 for bridging a payment to a target signature.
//!
//! The payer pre-signs each payment unit's spend digest against an adaptor
//! point `T` derived from a target signature. The signer can only spend a unit
//! by adding the hidden scalar `t`, and the spend signature reveals `t` back to
//! the payer, who rebuilds the target signature from it.
//! Uses crypto-rs (<https://github.com/BEULAHEVANJALIN/crypto-rs>) for elliptic curve operations.
pub mod adaptor;
pub use adaptor::{AdaptorRecord, TargetCommitment, build_adaptor_point};
mod challenge;
pub use challenge::compute_challenge;
pub mod complete;
pub use complete::{CompletedSignature, complete_adaptor, complete_checked, extract_secret};
pub mod config;
pub use config::BridgeConfig;
pub mod error;
pub use error::AdaptorError;
pub mod keys;
pub use keys::KeyPair;
pub mod nonce;
pub use nonce::NonceCommitment;
pub mod payer;
pub use payer::AdaptorBook;
pub mod scalar;
pub mod schnorr;
pub use schnorr::{MessageSigner, Signature};
pub mod session;
pub use session::{UnitLedger, UnitState};
pub mod settlement;
pub use settlement::{InMemoryMint, Settlement, SettlementObserver};
pub mod sign;
pub use sign::generate_adaptor;
pub mod signer;
pub mod unit;
pub use unit::{PaymentUnit, UnitId, validate_batch};
pub mod verify;
pub use verify::{VerifiedAdaptor, accept_adaptor, verify_adaptor};
