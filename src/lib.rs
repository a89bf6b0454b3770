//! # Ternary Chain - Cryptographic Core of a Ternary Ledger Client
//!
//! Everything a client needs before it talks to a node: encodings, hashing,
//! signatures, bundles and proof of work. When I come back to this code, here's
//! what I need to remember:
//!
//! ## What I Built
//! - **Balanced Ternary Codec**: trits, trytes, integers, ASCII and the 48-byte hash form
//! - **Curl and Kerl**: the scalar Curl sponge, a 64-lane bitwise Curl and Keccak-384 Kerl
//! - **One-Time Signatures**: key, digest and address derivation from seeds, plus multisig
//! - **Bundles**: finalizing, normalizing, signing and validating transfers
//! - **Proof of Work**: a multithreaded nonce search with cooperative interrupt
//!
//! ## How I Organized My Code
//! - `trinary/`: codec and the 384-bit bridge between trits and bytes
//! - `crypto/`: sponges, signing, checksums, multisig
//! - `core/`: transaction layout, bundles, proof of work
//! - `wallet/`: seeds, addresses, tags, transfers, input selection
//! - `config/`: settings with TOML and environment overrides
//! - `utils/`: timestamps, randomness, JSON helpers
//! - `cli/`: command-line interface over the whole toolkit
//!
//! ## When I Need to Understand Something
//! 1. Start with `main.rs` to see the CLI commands
//! 2. Look at `crypto/signing.rs` for how seeds become addresses
//! 3. Check `core/bundle.rs` for how transfers are hashed and signed
//! 4. Review `core/proof_of_work.rs` and `crypto/pair_curl.rs` for the nonce search

pub mod cli;
pub mod config;
pub mod core;
pub mod crypto;
pub mod error;
pub mod trinary;
pub mod utils;
pub mod wallet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt, SpongeArg};
pub use config::{Config, Settings, GLOBAL_CONFIG};
pub use crate::core::{normalized_bundle, Bundle, PowInterrupt, ProofOfWork, Transaction};
pub use crypto::{
    add_checksum, is_valid_checksum, remove_checksum, Curl, CurlMode, Kerl, MultisigAddress,
    PairCurl, Sponge,
};
pub use error::{Result, TernaryError};
pub use trinary::{
    bytes_to_trits, trits_to_bytes, trits_to_trytes, trytes_to_trits, BigInt384, Trit, Trits,
};
pub use utils::{current_timestamp, from_json, random_trytes, to_json};
pub use wallet::{select_inputs, Address, Inputs, Seed, Tag, Transfer};
