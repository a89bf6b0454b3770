//! Wallet-side models
//!
//! This module handles seeds, the addresses derived from them, tags and transfers,
//! and picking funded addresses as transfer inputs.

pub mod address;
pub mod inputs;
pub mod seed;
pub mod tag;
pub mod transfer;

pub use address::{Address, DEFAULT_SECURITY};
pub use inputs::{select_inputs, Inputs};
pub use seed::Seed;
pub use tag::Tag;
pub use transfer::Transfer;
