// This file implements bundles - the atomic unit of a transfer
// All entries share one bundle hash, and signatures are made over a normalized form of it

use crate::core::constants::{
    FRAGMENT_LENGTH, HASH_LENGTH, HASH_LENGTH_TRITS, KEY_FRAGMENT_LENGTH, MAX_TRYTE_VALUE,
};
use crate::core::transaction::Transaction;
use crate::crypto::signing::{self, Signature};
use crate::crypto::{Kerl, Sponge};
use crate::error::{Result, TernaryError};
use crate::trinary::{is_valid_hash, trits_to_trytes, tryte_value, trytes_to_trits, Trit};
use crate::wallet::Address;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bundle {
    transactions: Vec<Transaction>,
}

impl Bundle {
    pub fn new() -> Bundle {
        Bundle::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Bundle {
        Bundle { transactions }
    }

    // I use this when a node hands me raw transaction trytes in any order
    pub fn from_trytes(trytes: &[String]) -> Result<Bundle> {
        let mut transactions = trytes
            .iter()
            .map(|t| Transaction::from_trytes(t))
            .collect::<Result<Vec<_>>>()?;
        transactions.sort_by_key(|trx| trx.get_current_index());
        Ok(Bundle { transactions })
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get_transactions_mut(&mut self) -> &mut [Transaction] {
        &mut self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Bundle hash carried by the first entry, empty before finalize
    pub fn get_hash(&self) -> &str {
        self.transactions
            .first()
            .map(|trx| trx.get_bundle())
            .unwrap_or("")
    }

    /// Appends `trx`, plus zero-value slots when a message or signature spans several
    pub fn add_transaction(&mut self, trx: Transaction, signature_message_length: usize) {
        let filler = Transaction::new(
            trx.get_address(),
            0,
            trx.get_obsolete_tag(),
            trx.get_timestamp(),
        );
        self.transactions.push(trx);
        for _ in 1..signature_message_length {
            self.transactions.push(filler.clone());
        }
    }

    /// Finalizes with Kerl
    pub fn finalize(&mut self) -> Result<()> {
        self.finalize_with(&mut Kerl::new())
    }

    /// Assigns indices and stamps the bundle hash onto every entry
    pub fn finalize_with<S: Sponge<Cell = Trit>>(&mut self, sponge: &mut S) -> Result<()> {
        if self.transactions.is_empty() {
            return Err(TernaryError::InvalidBundle(
                "cannot finalize an empty bundle".to_string(),
            ));
        }
        let hash = self.hash_entries(sponge, true)?;
        for trx in self.transactions.iter_mut() {
            trx.set_bundle(&hash);
        }
        debug!("Finalized bundle {hash} with {} entries", self.len());
        Ok(())
    }

    // Absorbs every entry's essence and squeezes the bundle hash
    fn hash_entries<S: Sponge<Cell = Trit>>(
        &mut self,
        sponge: &mut S,
        reindex: bool,
    ) -> Result<String> {
        let last_index = self.transactions.len() as i64 - 1;
        sponge.reset();
        for (i, trx) in self.transactions.iter_mut().enumerate() {
            if reindex {
                trx.set_current_index(i as i64);
                trx.set_last_index(last_index);
            }
            let essence = trytes_to_trits(&trx.bundle_essence()?)?;
            sponge.absorb_all(&essence)?;
        }
        let mut hash = vec![0 as Trit; HASH_LENGTH_TRITS];
        sponge.squeeze_into(&mut hash)?;
        trits_to_trytes(&hash)
    }

    /// Fills signature fragments, references and nonce ahead of attachment
    pub fn add_trytes(&mut self, signature_fragments: &[String]) {
        for (i, trx) in self.transactions.iter_mut().enumerate() {
            match signature_fragments.get(i) {
                Some(fragment) if !fragment.is_empty() => trx.set_signature_fragments(fragment),
                _ => trx.set_signature_fragments(""),
            }
            trx.set_trunk_transaction("");
            trx.set_branch_transaction("");
            trx.set_nonce("");
            trx.fill_unset_references();
        }
    }

    /// Signs every input entry, and the zero-value slots that follow it, with its key
    pub fn sign_inputs(&mut self, seed: &str, inputs: &[Address]) -> Result<()> {
        let bundle_hash = self.get_hash().to_string();
        if !is_valid_hash(&bundle_hash) {
            return Err(TernaryError::InvalidBundle(
                "bundle must be finalized before signing".to_string(),
            ));
        }
        let normalized = normalized_bundle(&bundle_hash)?;

        let mut i = 0;
        while i < self.transactions.len() {
            if self.transactions[i].get_value() >= 0 {
                i += 1;
                continue;
            }
            let address = self.transactions[i].get_address().to_string();
            let input = inputs
                .iter()
                .find(|input| input.get_address() == address)
                .ok_or_else(|| {
                    TernaryError::InvalidAddress(format!("no key for input {address}"))
                })?;

            let security = input.get_security();
            let key = signing::key(seed, input.get_key_index(), security)?;

            for (j, key_fragment) in key.chunks_exact(KEY_FRAGMENT_LENGTH).enumerate() {
                let slot = self.transactions.get_mut(i + j).ok_or_else(|| {
                    TernaryError::InvalidBundle(format!(
                        "input {address} needs {security} slots"
                    ))
                })?;
                if j > 0 && (slot.get_address() != address || slot.get_value() != 0) {
                    return Err(TernaryError::InvalidBundle(format!(
                        "slot {} is not a signature slot for {address}",
                        i + j
                    )));
                }
                let group = &normalized[(j % 3) * FRAGMENT_LENGTH..][..FRAGMENT_LENGTH];
                let fragment = signing::signature_fragment(group, key_fragment)?;
                slot.set_signature_fragments(&trits_to_trytes(&fragment)?);
            }
            i += security as usize;
        }
        Ok(())
    }

    /// Tryte strings ready for attachment, last entry first
    pub fn to_trytes(&self) -> Result<Vec<String>> {
        self.transactions
            .iter()
            .rev()
            .map(|trx| trx.to_trytes())
            .collect()
    }

    /// Checks indices, value sum, bundle hash and every input signature
    pub fn validate(&self) -> Result<()> {
        if self.transactions.is_empty() {
            return Err(TernaryError::InvalidBundle("empty bundle".to_string()));
        }
        let bundle_hash = self.get_hash().to_string();
        let last_index = self.transactions.len() as i64 - 1;
        let mut sum: i64 = 0;
        let mut signatures: Vec<Signature> = Vec::new();

        for (i, trx) in self.transactions.iter().enumerate() {
            if trx.get_current_index() != i as i64 || trx.get_last_index() != last_index {
                return Err(TernaryError::InvalidBundle(format!(
                    "entry {i} carries index {}/{}",
                    trx.get_current_index(),
                    trx.get_last_index()
                )));
            }
            if trx.get_bundle() != bundle_hash {
                return Err(TernaryError::InvalidBundle(format!(
                    "entry {i} belongs to bundle {}",
                    trx.get_bundle()
                )));
            }
            sum = sum.checked_add(trx.get_value()).ok_or_else(|| {
                TernaryError::InvalidBundle("value sum overflows".to_string())
            })?;

            if trx.get_value() < 0 {
                let mut signature = Signature::new(trx.get_address(), Vec::new());
                signature.add_fragment(trx.get_signature_fragments().to_string());
                // Extra fragments sit in the zero-value slots that follow
                for next in self.transactions[i + 1..].iter() {
                    if next.get_address() != trx.get_address() || next.get_value() != 0 {
                        break;
                    }
                    signature.add_fragment(next.get_signature_fragments().to_string());
                }
                signatures.push(signature);
            }
        }

        if sum != 0 {
            return Err(TernaryError::InvalidBundleSum(sum));
        }

        let computed = self.clone().hash_entries(&mut Kerl::new(), false)?;
        if computed != bundle_hash {
            return Err(TernaryError::InvalidBundleHash {
                expected: bundle_hash,
                actual: computed,
            });
        }

        for signature in &signatures {
            let valid = signing::validate_signatures(
                signature.get_address(),
                signature.get_signature_fragments(),
                &bundle_hash,
            )?;
            if !valid {
                warn!("Signature check failed for {}", signature.get_address());
                return Err(TernaryError::InvalidSignature(
                    signature.get_address().to_string(),
                ));
            }
        }
        Ok(())
    }

    fn first_attachment_timestamp(&self) -> i64 {
        self.transactions
            .first()
            .map(|trx| trx.get_attachment_timestamp())
            .unwrap_or(0)
    }
}

// Two bundles are the same transfer when they share a bundle hash
impl PartialEq for Bundle {
    fn eq(&self, other: &Self) -> bool {
        self.get_hash() == other.get_hash()
    }
}

// Bundles from a ledger query are ordered by when their tail was attached
impl PartialOrd for Bundle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(
            self.first_attachment_timestamp()
                .cmp(&other.first_attachment_timestamp()),
        )
    }
}

/// Per-group zero-sum form of a bundle hash, what signatures actually commit to
pub fn normalized_bundle(bundle_hash: &str) -> Result<[i8; HASH_LENGTH]> {
    if bundle_hash.len() != HASH_LENGTH {
        return Err(TernaryError::length(
            "bundle hash",
            HASH_LENGTH,
            bundle_hash.len(),
        ));
    }

    let mut normalized = [0i8; HASH_LENGTH];
    for (slot, tryte) in normalized.iter_mut().zip(bundle_hash.chars()) {
        *slot = tryte_value(tryte).ok_or_else(|| {
            TernaryError::InvalidTrytes(format!("'{tryte}' in bundle hash"))
        })?;
    }

    for group in normalized.chunks_exact_mut(FRAGMENT_LENGTH) {
        let mut sum: i32 = group.iter().map(|&v| v as i32).sum();
        while sum > 0 {
            match group.iter_mut().find(|v| **v > -MAX_TRYTE_VALUE) {
                Some(value) => *value -= 1,
                None => break,
            }
            sum -= 1;
        }
        while sum < 0 {
            match group.iter_mut().find(|v| **v < MAX_TRYTE_VALUE) {
                Some(value) => *value += 1,
                None => break,
            }
            sum += 1;
        }
    }
    Ok(normalized)
}
