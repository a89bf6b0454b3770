//! Error handling for the ternary core
//!
//! Every fallible operation in the crate reports one of these variants. Validation
//! variants reject malformed input at the point it is detected, consistency variants
//! come out of bundle and signature verification.

use std::fmt;

/// Result type alias for ternary operations
pub type Result<T> = std::result::Result<T, TernaryError>;

/// Error types for codec, sponge, signing, bundle and proof-of-work operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TernaryError {
    /// A character outside the tryte alphabet, or a malformed tryte string
    InvalidTrytes(String),
    /// A trit outside {-1, 0, 1}
    InvalidTrits(String),
    /// Input of the wrong length
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Security level outside 1..=3
    InvalidSecurityLevel(i64),
    /// Invalid address format or checksum
    InvalidAddress(String),
    /// Invalid seed format
    InvalidSeed(String),
    /// Invalid tag format
    InvalidTag(String),
    /// Sponge misuse (absorb/squeeze length)
    Crypto(String),
    /// Structurally broken bundle (index order, empty bundle)
    InvalidBundle(String),
    /// Bundle values do not add up to zero
    InvalidBundleSum(i64),
    /// Recomputed bundle hash differs from the stamped one
    InvalidBundleHash { expected: String, actual: String },
    /// Signature fragments do not derive the input address
    InvalidSignature(String),
    /// Worker pool for the nonce search could not be started
    ProofOfWork(String),
    /// System clock unusable (before the epoch, or out of range)
    Clock(String),
    /// Input selection could not reach the requested threshold
    NotEnoughBalance { required: i64, available: i64 },
    /// Configuration errors
    Config(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
}

impl TernaryError {
    /// Input rejected before any computation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TernaryError::InvalidTrytes(_)
                | TernaryError::InvalidTrits(_)
                | TernaryError::InvalidLength { .. }
                | TernaryError::InvalidSecurityLevel(_)
                | TernaryError::InvalidAddress(_)
                | TernaryError::InvalidSeed(_)
                | TernaryError::InvalidTag(_)
                | TernaryError::Crypto(_)
        )
    }

    /// Data that was well formed but does not verify
    pub fn is_consistency(&self) -> bool {
        matches!(
            self,
            TernaryError::InvalidBundle(_)
                | TernaryError::InvalidBundleSum(_)
                | TernaryError::InvalidBundleHash { .. }
                | TernaryError::InvalidSignature(_)
        )
    }

    pub(crate) fn length(what: &'static str, expected: usize, actual: usize) -> Self {
        TernaryError::InvalidLength {
            what,
            expected,
            actual,
        }
    }
}

impl fmt::Display for TernaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TernaryError::InvalidTrytes(msg) => write!(f, "Invalid trytes: {msg}"),
            TernaryError::InvalidTrits(msg) => write!(f, "Invalid trits: {msg}"),
            TernaryError::InvalidLength {
                what,
                expected,
                actual,
            } => write!(
                f,
                "Invalid {what} length: expected {expected}, got {actual}"
            ),
            TernaryError::InvalidSecurityLevel(level) => {
                write!(f, "Invalid security level: {level}")
            }
            TernaryError::InvalidAddress(addr) => write!(f, "Invalid address: {addr}"),
            TernaryError::InvalidSeed(msg) => write!(f, "Invalid seed: {msg}"),
            TernaryError::InvalidTag(tag) => write!(f, "Invalid tag: {tag}"),
            TernaryError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            TernaryError::InvalidBundle(msg) => write!(f, "Invalid bundle: {msg}"),
            TernaryError::InvalidBundleSum(sum) => write!(f, "Invalid bundle sum: {sum}"),
            TernaryError::InvalidBundleHash { expected, actual } => write!(
                f,
                "Invalid bundle hash: expected {expected}, computed {actual}"
            ),
            TernaryError::InvalidSignature(addr) => {
                write!(f, "Invalid signature for address {addr}")
            }
            TernaryError::NotEnoughBalance {
                required,
                available,
            } => {
                write!(
                    f,
                    "Not enough balance: required {required}, available {available}"
                )
            }
            TernaryError::ProofOfWork(msg) => write!(f, "Proof of work error: {msg}"),
            TernaryError::Clock(msg) => write!(f, "Clock error: {msg}"),
            TernaryError::Config(msg) => write!(f, "Configuration error: {msg}"),
            TernaryError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            TernaryError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for TernaryError {}

impl From<std::io::Error> for TernaryError {
    fn from(err: std::io::Error) -> Self {
        TernaryError::Io(err.to_string())
    }
}

impl From<std::time::SystemTimeError> for TernaryError {
    fn from(err: std::time::SystemTimeError) -> Self {
        TernaryError::Clock(err.to_string())
    }
}

impl From<serde_json::Error> for TernaryError {
    fn from(err: serde_json::Error) -> Self {
        TernaryError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for TernaryError {
    fn from(err: toml::de::Error) -> Self {
        TernaryError::Config(err.to_string())
    }
}
