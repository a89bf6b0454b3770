//! Core ledger structures
//!
//! This module contains the transaction layout, bundles and the proof-of-work
//! nonce search that makes a transaction attachable.

pub mod bundle;
pub mod constants;
pub mod proof_of_work;
pub mod transaction;

pub use bundle::{normalized_bundle, Bundle};
pub use constants::{
    check_security, ADDRESS_LENGTH, ADDRESS_LENGTH_WITH_CHECKSUM, EMPTY_HASH, HASH_LENGTH,
    HASH_LENGTH_TRITS, SEED_LENGTH, TAG_LENGTH, TRANSACTION_LENGTH,
};
pub use proof_of_work::{PowInterrupt, ProofOfWork};
pub use transaction::{layout, FieldRange, Transaction};
