//! One-time signatures over Kerl
//!
//! A key is `security` fragments of 27 hash-width chunks. Signing a chunk hashes it
//! `13 - n` times for a normalized bundle value `n`, verifying hashes the signature a
//! further `13 + n` times. Both sides end at the chunk hashed 26 times, which is what
//! the address commits to.

use crate::core::constants::{
    check_security, ADDRESS_LENGTH, ADDRESS_LENGTH_WITH_CHECKSUM, FRAGMENT_LENGTH,
    HASH_LENGTH_TRITS, KEY_FRAGMENT_LENGTH, MAX_TRYTE_VALUE, SEED_LENGTH,
    SIGNATURE_FRAGMENT_LENGTH,
};
use crate::core::bundle::normalized_bundle;
use crate::crypto::kerl::Kerl;
use crate::crypto::sponge::Sponge;
use crate::error::{Result, TernaryError};
use crate::trinary::{
    add_to_trits, check_trytes, is_valid_trytes, pad_trytes, trits_to_trytes, trytes_to_trits,
    Trit, Trits,
};
use serde::{Deserialize, Serialize};

/// Address plus the fragments that sign for it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    address: String,
    signature_fragments: Vec<String>,
}

impl Signature {
    pub fn new(address: &str, signature_fragments: Vec<String>) -> Signature {
        Signature {
            address: address.to_string(),
            signature_fragments,
        }
    }

    pub fn get_address(&self) -> &str {
        &self.address
    }

    pub fn get_signature_fragments(&self) -> &[String] {
        &self.signature_fragments
    }

    pub fn add_fragment(&mut self, fragment: String) {
        self.signature_fragments.push(fragment);
    }
}

/// Seed trits padded to a full hash width
fn seed_trits(seed: &str) -> Result<Trits> {
    check_trytes(seed).map_err(|e| TernaryError::InvalidSeed(e.to_string()))?;
    if seed.len() > SEED_LENGTH {
        return Err(TernaryError::InvalidSeed(format!(
            "{} trytes, at most {SEED_LENGTH} allowed",
            seed.len()
        )));
    }
    trytes_to_trits(&pad_trytes(seed, SEED_LENGTH))
}

/// Private key for `(seed, index, security)`, `security * 6561` trits
pub fn key(seed: &str, index: u64, security: u8) -> Result<Trits> {
    check_security(security)?;
    let mut seed = seed_trits(seed)?;

    let index = i64::try_from(index)
        .map_err(|_| TernaryError::InvalidSeed(format!("key index {index} out of range")))?;
    add_to_trits(&mut seed, index);

    let mut kerl = Kerl::new();
    kerl.absorb_all(&seed)?;
    kerl.squeeze_into(&mut seed)?;
    kerl.reset();
    kerl.absorb_all(&seed)?;

    let mut key = vec![0 as Trit; security as usize * KEY_FRAGMENT_LENGTH];
    kerl.squeeze_into(&mut key)?;
    Ok(key)
}

fn check_fragments(trits: &[Trit], what: &'static str) -> Result<()> {
    if trits.is_empty() || trits.len() % KEY_FRAGMENT_LENGTH != 0 {
        return Err(TernaryError::InvalidLength {
            what,
            expected: KEY_FRAGMENT_LENGTH,
            actual: trits.len(),
        });
    }
    Ok(())
}

/// Hashes one 243-trit chunk in place `times` times
fn hash_chunk(kerl: &mut Kerl, chunk: &mut [Trit], times: usize) -> Result<()> {
    for _ in 0..times {
        kerl.reset();
        kerl.absorb_all(chunk)?;
        kerl.squeeze_into(chunk)?;
    }
    Ok(())
}

/// One 243-trit digest per key fragment
pub fn digests(key: &[Trit]) -> Result<Trits> {
    check_fragments(key, "key")?;
    let mut kerl = Kerl::new();
    let mut digests = Trits::with_capacity(key.len() / FRAGMENT_LENGTH);

    for key_fragment in key.chunks_exact(KEY_FRAGMENT_LENGTH) {
        let mut fragment = key_fragment.to_vec();
        for chunk in fragment.chunks_exact_mut(HASH_LENGTH_TRITS) {
            hash_chunk(&mut kerl, chunk, FRAGMENT_LENGTH - 1)?;
        }

        kerl.reset();
        kerl.absorb_all(&fragment)?;
        let mut digest = vec![0 as Trit; HASH_LENGTH_TRITS];
        kerl.squeeze_into(&mut digest)?;
        digests.extend_from_slice(&digest);
    }
    Ok(digests)
}

/// Address trits committing to a set of digests
pub fn address(digests: &[Trit]) -> Result<Trits> {
    if digests.is_empty() || digests.len() % HASH_LENGTH_TRITS != 0 {
        return Err(TernaryError::length(
            "digests",
            HASH_LENGTH_TRITS,
            digests.len(),
        ));
    }
    Kerl::new().hash(digests)
}

fn check_normalized(normalized_fragment: &[i8]) -> Result<()> {
    if normalized_fragment.len() < FRAGMENT_LENGTH {
        return Err(TernaryError::length(
            "normalized fragment",
            FRAGMENT_LENGTH,
            normalized_fragment.len(),
        ));
    }
    match normalized_fragment[..FRAGMENT_LENGTH]
        .iter()
        .find(|v| !(-MAX_TRYTE_VALUE..=MAX_TRYTE_VALUE).contains(*v))
    {
        Some(value) => Err(TernaryError::InvalidTrits(format!(
            "normalized value {value} outside [-13, 13]"
        ))),
        None => Ok(()),
    }
}

/// Verifier side: finishes the hash chains of a signature fragment
pub fn digest(normalized_fragment: &[i8], signature_fragment: &[Trit]) -> Result<Trits> {
    check_normalized(normalized_fragment)?;
    if signature_fragment.len() != KEY_FRAGMENT_LENGTH {
        return Err(TernaryError::length(
            "signature fragment",
            KEY_FRAGMENT_LENGTH,
            signature_fragment.len(),
        ));
    }

    let mut accumulator = Kerl::new();
    let mut kerl = Kerl::new();
    let mut buffer = [0 as Trit; HASH_LENGTH_TRITS];

    for (chunk, &value) in signature_fragment
        .chunks_exact(HASH_LENGTH_TRITS)
        .zip(normalized_fragment)
    {
        buffer.copy_from_slice(chunk);
        hash_chunk(&mut kerl, &mut buffer, (value + MAX_TRYTE_VALUE) as usize)?;
        accumulator.absorb_all(&buffer)?;
    }

    let mut digest = vec![0 as Trit; HASH_LENGTH_TRITS];
    accumulator.squeeze_into(&mut digest)?;
    Ok(digest)
}

/// Signer side: advances each key chunk `13 - n` steps along its hash chain
pub fn signature_fragment(normalized_fragment: &[i8], key_fragment: &[Trit]) -> Result<Trits> {
    check_normalized(normalized_fragment)?;
    if key_fragment.len() != KEY_FRAGMENT_LENGTH {
        return Err(TernaryError::length(
            "key fragment",
            KEY_FRAGMENT_LENGTH,
            key_fragment.len(),
        ));
    }

    let mut kerl = Kerl::new();
    let mut fragment = key_fragment.to_vec();
    for (chunk, &value) in fragment
        .chunks_exact_mut(HASH_LENGTH_TRITS)
        .zip(normalized_fragment)
    {
        hash_chunk(&mut kerl, chunk, (MAX_TRYTE_VALUE - value) as usize)?;
    }
    Ok(fragment)
}

/// Derives the 81-tryte address for `(seed, index, security)`
pub fn new_address(seed: &str, index: u64, security: u8) -> Result<String> {
    let key = key(seed, index, security)?;
    let digests = digests(&key)?;
    trits_to_trytes(&address(&digests)?)
}

/// True when the fragments reproduce `expected_address` for this bundle hash
pub fn validate_signatures(
    expected_address: &str,
    signature_fragments: &[String],
    bundle_hash: &str,
) -> Result<bool> {
    if !is_valid_trytes(expected_address) {
        return Err(TernaryError::InvalidAddress(format!(
            "{expected_address} is not trytes"
        )));
    }
    let expected = match expected_address.len() {
        ADDRESS_LENGTH | ADDRESS_LENGTH_WITH_CHECKSUM => &expected_address[..ADDRESS_LENGTH],
        other => {
            return Err(TernaryError::InvalidAddress(format!(
                "{other} trytes, expected {ADDRESS_LENGTH} or {ADDRESS_LENGTH_WITH_CHECKSUM}"
            )))
        }
    };
    if signature_fragments.is_empty() {
        return Ok(false);
    }

    let normalized = normalized_bundle(bundle_hash)?;
    let mut digests = Trits::with_capacity(signature_fragments.len() * HASH_LENGTH_TRITS);

    for (i, fragment) in signature_fragments.iter().enumerate() {
        if fragment.len() != SIGNATURE_FRAGMENT_LENGTH {
            return Err(TernaryError::length(
                "signature fragment",
                SIGNATURE_FRAGMENT_LENGTH,
                fragment.len(),
            ));
        }
        let group = i % 3;
        let normalized_fragment = &normalized[group * FRAGMENT_LENGTH..][..FRAGMENT_LENGTH];
        let fragment_trits = trytes_to_trits(fragment)?;
        digests.extend_from_slice(&digest(normalized_fragment, &fragment_trits)?);
    }

    let derived = trits_to_trytes(&address(&digests)?)?;
    Ok(derived == expected)
}
