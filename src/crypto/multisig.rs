//! Multisig addresses
//!
//! Several cosigners each contribute the digests of one of their keys. The address is
//! the Kerl hash of all digests in cosigner order, and every cosigner later signs the
//! bundle slots that follow the ones already signed.

use crate::core::bundle::{normalized_bundle, Bundle};
use crate::core::constants::{FRAGMENT_LENGTH, HASH_LENGTH_TRITS, KEY_FRAGMENT_LENGTH};
use crate::crypto::kerl::Kerl;
use crate::crypto::signing;
use crate::crypto::sponge::Sponge;
use crate::error::{Result, TernaryError};
use crate::trinary::{trits_to_trytes, Trit, Trits};

/// Builder that absorbs cosigner digests and finalizes into an address
#[derive(Clone, Default)]
pub struct MultisigAddress {
    kerl: Kerl,
    cosigners: usize,
}

impl MultisigAddress {
    pub fn new() -> MultisigAddress {
        MultisigAddress::default()
    }

    /// Adds one cosigner's digests, order matters
    pub fn absorb(&mut self, digests: &[Trit]) -> Result<()> {
        self.kerl.absorb_all(digests)?;
        self.cosigners += 1;
        Ok(())
    }

    pub fn get_cosigners(&self) -> usize {
        self.cosigners
    }

    /// 81-tryte address over everything absorbed so far
    pub fn finalize(&mut self) -> Result<String> {
        if self.cosigners == 0 {
            return Err(TernaryError::InvalidAddress(
                "multisig address needs at least one cosigner".to_string(),
            ));
        }
        let mut address = vec![0 as Trit; HASH_LENGTH_TRITS];
        self.kerl.squeeze_into(&mut address)?;
        trits_to_trytes(&address)
    }
}

/// Digests a cosigner shares for `(seed, index, security)`
pub fn get_digest(seed: &str, index: u64, security: u8) -> Result<Trits> {
    signing::digests(&signing::key(seed, index, security)?)
}

/// True when `digests`, in order, hash to `address`
pub fn validate_address(address: &str, digests: &[Trits]) -> Result<bool> {
    let mut builder = MultisigAddress::new();
    for digest in digests {
        builder.absorb(digest)?;
    }
    Ok(builder.finalize()? == address)
}

fn is_unsigned(fragment: &str) -> bool {
    fragment.bytes().all(|c| c == b'9')
}

/// Signs the first unsigned slots of `input_address` with one cosigner's key
pub fn add_signature(bundle: &mut Bundle, input_address: &str, key: &[Trit]) -> Result<()> {
    if key.is_empty() || key.len() % KEY_FRAGMENT_LENGTH != 0 {
        return Err(TernaryError::length("key", KEY_FRAGMENT_LENGTH, key.len()));
    }
    let security = key.len() / KEY_FRAGMENT_LENGTH;

    let transactions = bundle.get_transactions_mut();
    let mut signed = 0;
    let Some(start) = transactions.iter().position(|trx| {
        if trx.get_address() != input_address {
            return false;
        }
        if is_unsigned(trx.get_signature_fragments()) {
            return true;
        }
        signed += 1;
        false
    }) else {
        return Err(TernaryError::InvalidBundle(format!(
            "no unsigned slot left for {input_address}"
        )));
    };

    let normalized = normalized_bundle(transactions[start].get_bundle())?;
    for (j, key_fragment) in key.chunks_exact(KEY_FRAGMENT_LENGTH).enumerate() {
        let slot = transactions.get_mut(start + j).ok_or_else(|| {
            TernaryError::InvalidBundle(format!("input {input_address} needs {security} slots"))
        })?;
        let group = ((signed + j) % 3) * FRAGMENT_LENGTH;
        let fragment =
            signing::signature_fragment(&normalized[group..group + FRAGMENT_LENGTH], key_fragment)?;
        slot.set_signature_fragments(&trits_to_trytes(&fragment)?);
    }
    Ok(())
}

/// Collects the signed slots of `input_address` and checks them against it
pub fn validate_multisig(bundle: &Bundle, input_address: &str) -> Result<bool> {
    let mut bundle_hash = "";
    let mut fragments = Vec::new();
    for trx in bundle.get_transactions() {
        if trx.get_address() != input_address {
            continue;
        }
        bundle_hash = trx.get_bundle();
        // The remainder slot carries no signature
        if is_unsigned(trx.get_signature_fragments()) {
            break;
        }
        fragments.push(trx.get_signature_fragments().to_string());
    }
    signing::validate_signatures(input_address, &fragments, bundle_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::Transaction;

    const SEED_ONE: &str =
        "ABCDFG9ABCDFG9ABCDFG9ABCDFG9ABCDFG9ABCDFG9ABCDFG9ABCDFG9ABCDFG9ABCDFG9ABCDFG9ABCD";
    const SEED_TWO: &str =
        "FDSAG9FDSAG9FDSAG9FDSAG9FDSAG9FDSAG9FDSAG9FDSAG9FDSAG9FDSAG9FDSAG9FDSAG9FDSAG9FDS";
    const RECEIVER: &str =
        "RGVOWCDJAGSUSEPGFRTRAJYHFHZXJCPGFMEWYHSHVFUIFBKHGSBNGILWTSDKSNXICNJCOPFMAAZHCHJQD";

    #[test]
    fn test_address_from_digests() {
        let first = get_digest(SEED_ONE, 0, 1).unwrap();
        let second = get_digest(SEED_TWO, 0, 2).unwrap();

        let mut builder = MultisigAddress::new();
        builder.absorb(&first).unwrap();
        builder.absorb(&second).unwrap();
        assert_eq!(builder.get_cosigners(), 2);
        let address = builder.finalize().unwrap();

        assert!(validate_address(&address, &[first.clone(), second.clone()]).unwrap());
        assert!(!validate_address(&address, &[second, first]).unwrap());
        assert!(MultisigAddress::new().finalize().is_err());
    }

    #[test]
    fn test_cosigners_sign_in_turn() {
        let first = get_digest(SEED_ONE, 0, 1).unwrap();
        let second = get_digest(SEED_TWO, 0, 1).unwrap();
        let mut builder = MultisigAddress::new();
        builder.absorb(&first).unwrap();
        builder.absorb(&second).unwrap();
        let address = builder.finalize().unwrap();

        let mut bundle = Bundle::new();
        bundle.add_transaction(Transaction::new(RECEIVER, 50, "MULTISIG", 0), 1);
        bundle.add_transaction(Transaction::new(&address, -50, "MULTISIG", 0), 2);
        bundle.finalize().unwrap();
        bundle.add_trytes(&[]);

        add_signature(&mut bundle, &address, &signing::key(SEED_ONE, 0, 1).unwrap()).unwrap();
        assert!(!validate_multisig(&bundle, &address).unwrap());
        add_signature(&mut bundle, &address, &signing::key(SEED_TWO, 0, 1).unwrap()).unwrap();
        assert!(validate_multisig(&bundle, &address).unwrap());
        bundle.validate().unwrap();

        let extra = signing::key(SEED_ONE, 1, 1).unwrap();
        assert!(add_signature(&mut bundle, &address, &extra).is_err());
    }

    #[test]
    fn test_rejects_bad_key() {
        let mut bundle = Bundle::new();
        assert!(add_signature(&mut bundle, RECEIVER, &[0; 10]).is_err());
    }
}
