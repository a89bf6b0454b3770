//! Utility functions and helpers
//!
//! This module contains time and randomness helpers plus the JSON
//! serialization used by the CLI.

pub mod crypto;
pub mod serialization;

pub use crypto::{current_timestamp, random_trytes};

pub use serialization::{from_json, to_json};
