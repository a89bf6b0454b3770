//! Hashing and signing
//!
//! Curl in scalar and lane-parallel form, Kerl on top of Keccak-384, the one-time
//! signature scheme, address checksums and multisig addresses.

pub mod checksum;
pub mod curl;
pub mod kerl;
pub mod multisig;
pub mod pair_curl;
pub mod signing;
pub mod sponge;

pub use checksum::{add_checksum, checksum, is_valid_checksum, remove_checksum};
pub use curl::{Curl, CurlMode, STATE_LENGTH};
pub use kerl::Kerl;
pub use multisig::{validate_multisig, MultisigAddress};
pub use pair_curl::{pair_transform, PairCurl, PairState, TritPair};
pub use signing::{
    address, digest, digests, key, new_address, signature_fragment, validate_signatures,
    Signature,
};
pub use sponge::Sponge;
