use crate::core::constants::{check_security, SEED_LENGTH};
use crate::crypto::signing;
use crate::error::{Result, TernaryError};
use crate::trinary::{is_valid_trytes, pad_trytes};
use crate::utils::random_trytes;
use crate::wallet::Address;
use log::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 81-tryte seed with the security level its addresses are derived at.
/// The trytes are wiped from memory when the seed is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed {
    trytes: String,
    security: u8,
}

impl Seed {
    /// Right-pads shorter input with `9`
    pub fn new(seed: &str, security: u8) -> Result<Seed> {
        if seed.len() > SEED_LENGTH {
            return Err(TernaryError::InvalidSeed(format!(
                "{} trytes, at most {SEED_LENGTH} allowed",
                seed.len()
            )));
        }
        if !is_valid_trytes(seed) {
            return Err(TernaryError::InvalidSeed(
                "seed is not a tryte string".to_string(),
            ));
        }
        Ok(Seed {
            trytes: pad_trytes(seed, SEED_LENGTH),
            security: check_security(security)?,
        })
    }

    /// Fresh seed from the thread-local CSPRNG
    pub fn random(security: u8) -> Result<Seed> {
        let mut trytes = random_trytes(SEED_LENGTH);
        let seed = Seed::new(&trytes, security);
        trytes.zeroize();
        seed
    }

    /// Raw trytes, handle with care
    pub fn get_trytes(&self) -> &str {
        &self.trytes
    }

    pub fn get_security(&self) -> u8 {
        self.security
    }

    pub fn set_security(&mut self, security: u8) -> Result<()> {
        self.security = check_security(security)?;
        Ok(())
    }

    /// Address at `index`, with its checksum computed up front when asked
    pub fn new_address(&self, index: u64, checksum: bool) -> Result<Address> {
        let trytes = signing::new_address(&self.trytes, index, self.security)?;
        let mut address = Address::with_key(&trytes, 0, index, self.security)?;
        if checksum {
            address.get_checksum()?;
        }
        Ok(address)
    }

    /// `total` consecutive addresses starting at `start`
    pub fn new_addresses(&self, start: u64, total: u64, checksum: bool) -> Result<Vec<Address>> {
        debug!("Deriving {total} addresses from index {start}");
        (start..start.saturating_add(total))
            .map(|index| self.new_address(index, checksum))
            .collect()
    }
}

impl PartialEq for Seed {
    fn eq(&self, other: &Self) -> bool {
        self.trytes == other.trytes
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seed")
            .field("security", &self.security)
            .finish()
    }
}
