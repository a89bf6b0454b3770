// JSON helpers for handing transactions and bundles to other tools
use crate::error::{Result, TernaryError};
use serde::{de::DeserializeOwned, Serialize};

/// Serialize data as pretty-printed JSON
pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| TernaryError::Serialization(format!("Serialization failed: {e}")))
}

/// Deserialize data from JSON
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json)
        .map_err(|e| TernaryError::Serialization(format!("Deserialization failed: {e}")))
}
