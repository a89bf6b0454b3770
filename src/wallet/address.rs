use crate::core::constants::{check_security, ADDRESS_LENGTH, ADDRESS_LENGTH_WITH_CHECKSUM};
use crate::crypto::checksum;
use crate::error::{Result, TernaryError};
use crate::trinary::is_valid_trytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Security level assumed when an address is parsed without one
pub const DEFAULT_SECURITY: u8 = 2;

/// An 81-tryte address plus what a wallet knows about it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    address: String,
    // Cached once computed, a 90-tryte input keeps the checksum it came with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checksum: Option<String>,
    balance: i64,
    key_index: u64,
    security: u8,
}

impl Address {
    /// Parses 81 trytes, or 90 with a trailing checksum
    pub fn new(address: &str) -> Result<Address> {
        if !is_valid_trytes(address) {
            return Err(TernaryError::InvalidAddress(format!(
                "'{address}' is not a tryte string"
            )));
        }
        let checksum = match address.len() {
            ADDRESS_LENGTH => None,
            ADDRESS_LENGTH_WITH_CHECKSUM => Some(address[ADDRESS_LENGTH..].to_string()),
            other => {
                return Err(TernaryError::InvalidAddress(format!(
                    "{other} trytes, expected {ADDRESS_LENGTH} or {ADDRESS_LENGTH_WITH_CHECKSUM}"
                )))
            }
        };
        Ok(Address {
            address: address[..ADDRESS_LENGTH].to_string(),
            checksum,
            balance: 0,
            key_index: 0,
            security: DEFAULT_SECURITY,
        })
    }

    /// Address owned by a seed at `key_index`
    pub fn with_key(address: &str, balance: i64, key_index: u64, security: u8) -> Result<Address> {
        let mut result = Address::new(address)?;
        result.balance = balance;
        result.key_index = key_index;
        result.set_security(security)?;
        Ok(result)
    }

    pub fn get_address(&self) -> &str {
        &self.address
    }

    /// Checksum, computed on first use
    pub fn get_checksum(&mut self) -> Result<&str> {
        let checksum = match self.checksum.take() {
            Some(cached) => cached,
            None => checksum::checksum(&self.address)?,
        };
        Ok(self.checksum.insert(checksum))
    }

    /// Drops the cached checksum and computes it again
    pub fn revalidate_checksum(&mut self) -> Result<&str> {
        self.checksum = None;
        self.get_checksum()
    }

    pub fn get_address_with_checksum(&mut self) -> Result<String> {
        let checksum = self.get_checksum()?.to_string();
        Ok(format!("{}{checksum}", self.address))
    }

    /// False when a checksum came with the address and does not match it
    pub fn has_valid_checksum(&self) -> Result<bool> {
        match &self.checksum {
            Some(cached) => Ok(*cached == checksum::checksum(&self.address)?),
            None => Ok(true),
        }
    }

    pub fn get_balance(&self) -> i64 {
        self.balance
    }

    pub fn set_balance(&mut self, balance: i64) {
        self.balance = balance;
    }

    pub fn get_key_index(&self) -> u64 {
        self.key_index
    }

    pub fn set_key_index(&mut self, key_index: u64) {
        self.key_index = key_index;
    }

    pub fn get_security(&self) -> u8 {
        self.security
    }

    pub fn set_security(&mut self, security: u8) -> Result<()> {
        self.security = check_security(security)?;
        Ok(())
    }
}

// Same address whatever the wallet metadata says
impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Address {}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}
