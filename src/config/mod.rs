//! Configuration management
//!
//! This module handles the tunable settings of the ternary core: proof-of-work
//! threads and weight, the default security level and the Curl round count.
//!
//! Defaults can be replaced by a TOML file and overridden by environment variables.

pub mod settings;

pub use settings::{Config, Settings, GLOBAL_CONFIG};
