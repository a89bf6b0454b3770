use crate::core::constants::{ADDRESS_LENGTH, ADDRESS_LENGTH_WITH_CHECKSUM, CHECKSUM_LENGTH};
use crate::crypto::kerl::Kerl;
use crate::crypto::sponge::Sponge;
use crate::error::{Result, TernaryError};
use crate::trinary::{is_valid_trytes_of_len, trits_to_trytes, trytes_to_trits};

fn check_bare_address(address: &str) -> Result<()> {
    if !is_valid_trytes_of_len(address, ADDRESS_LENGTH) {
        return Err(TernaryError::InvalidAddress(format!(
            "expected {ADDRESS_LENGTH} trytes, got '{address}'"
        )));
    }
    Ok(())
}

/// 9-tryte checksum of an 81-tryte address: the tail of its Kerl hash
pub fn checksum(address: &str) -> Result<String> {
    check_bare_address(address)?;
    let hash = Kerl::new().hash(&trytes_to_trits(address)?)?;
    let trytes = trits_to_trytes(&hash)?;
    Ok(trytes[ADDRESS_LENGTH - CHECKSUM_LENGTH..].to_string())
}

pub fn add_checksum(address: &str) -> Result<String> {
    Ok(format!("{address}{}", checksum(address)?))
}

pub fn remove_checksum(address: &str) -> Result<String> {
    if !is_valid_trytes_of_len(address, ADDRESS_LENGTH_WITH_CHECKSUM) {
        return Err(TernaryError::InvalidAddress(format!(
            "expected {ADDRESS_LENGTH_WITH_CHECKSUM} trytes, got '{address}'"
        )));
    }
    Ok(address[..ADDRESS_LENGTH].to_string())
}

pub fn is_valid_checksum(address_with_checksum: &str) -> bool {
    match remove_checksum(address_with_checksum) {
        Ok(bare) => add_checksum(&bare)
            .map(|full| full == address_with_checksum)
            .unwrap_or(false),
        Err(_) => false,
    }
}
