// This file implements the transaction model - one fixed-size slot of a bundle
// Every field lives at a fixed tryte offset inside a 2673-tryte string, and node software
// reads exactly these offsets, so the layout table below is the one thing I never touch

use crate::core::constants::{
    ADDRESS_LENGTH, ADDRESS_LENGTH_WITH_CHECKSUM, EMPTY_HASH, HASH_LENGTH_TRITS,
    SIGNATURE_FRAGMENT_LENGTH, TRANSACTION_LENGTH, TRITS_PER_TRYTE,
};
use crate::crypto::{Curl, CurlMode, Sponge};
use crate::error::{Result, TernaryError};
use crate::trinary::{
    check_trytes, int_to_trits_padded, is_valid_trytes, pad_trytes, trits_to_int,
    trits_to_trytes, trytes_to_trits, Trit, Trits,
};
use serde::{Deserialize, Serialize};

/// A field's position inside the transaction tryte string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRange {
    pub start: usize,
    pub length: usize,
}

impl FieldRange {
    pub const fn new(start: usize, length: usize) -> FieldRange {
        FieldRange { start, length }
    }

    pub const fn end(&self) -> usize {
        self.start + self.length
    }

    /// Same range measured in trits
    pub const fn in_trits(&self) -> FieldRange {
        FieldRange {
            start: self.start * TRITS_PER_TRYTE,
            length: self.length * TRITS_PER_TRYTE,
        }
    }

    fn slice<'a, T>(&self, data: &'a [T]) -> &'a [T] {
        &data[self.start..self.end()]
    }
}

/// Tryte offsets of every transaction field
pub mod layout {
    use super::FieldRange;

    pub const SIGNATURE_FRAGMENTS: FieldRange = FieldRange::new(0, 2187);
    pub const ADDRESS: FieldRange = FieldRange::new(2187, 81);
    pub const VALUE: FieldRange = FieldRange::new(2268, 27);
    pub const OBSOLETE_TAG: FieldRange = FieldRange::new(2295, 27);
    pub const TIMESTAMP: FieldRange = FieldRange::new(2322, 9);
    pub const CURRENT_INDEX: FieldRange = FieldRange::new(2331, 9);
    pub const LAST_INDEX: FieldRange = FieldRange::new(2340, 9);
    pub const BUNDLE: FieldRange = FieldRange::new(2349, 81);
    pub const TRUNK_TRANSACTION: FieldRange = FieldRange::new(2430, 81);
    pub const BRANCH_TRANSACTION: FieldRange = FieldRange::new(2511, 81);
    pub const TAG: FieldRange = FieldRange::new(2592, 27);
    pub const ATTACHMENT_TIMESTAMP: FieldRange = FieldRange::new(2619, 9);
    pub const ATTACHMENT_TIMESTAMP_LOWER_BOUND: FieldRange = FieldRange::new(2628, 9);
    pub const ATTACHMENT_TIMESTAMP_UPPER_BOUND: FieldRange = FieldRange::new(2637, 9);
    pub const NONCE: FieldRange = FieldRange::new(2646, 27);

    /// Only the low 33 trits of the value field carry data
    pub const VALUE_TRITS: FieldRange = FieldRange::new(6804, 33);
    /// Trytes above `VALUE_TRITS`, always `9` in a valid transaction
    pub const VALUE_PADDING: FieldRange = FieldRange::new(2279, 16);
}

/// Everything the bundle hash commits to: address through last index
pub const BUNDLE_ESSENCE: FieldRange =
    FieldRange::new(layout::ADDRESS.start, layout::BUNDLE.start - layout::ADDRESS.start);

/// Trits up to the last 243-trit block, which proof of work rewrites
pub const POW_PREFIX_TRITS: usize = (TRANSACTION_LENGTH * TRITS_PER_TRYTE) - HASH_LENGTH_TRITS;

// This is one transaction in its decoded form
// String fields hold trytes, numeric fields hold plain integers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    hash: String,                 // Curl-P-81 hash, filled in when parsing
    signature_fragments: String,  // Signature or message, 2187 trytes
    address: String,              // Sender or receiver, 81 trytes without checksum
    value: i64,                   // Negative for inputs, positive for outputs
    obsolete_tag: String,         // The tag the bundle hash commits to
    timestamp: i64,               // Seconds since the epoch
    current_index: i64,           // Position inside the bundle
    last_index: i64,              // Bundle length minus one
    bundle: String,               // Hash shared by every transaction in the bundle
    trunk_transaction: String,    // First approved transaction
    branch_transaction: String,   // Second approved transaction
    tag: String,                  // Free-form 27-tryte tag
    attachment_timestamp: i64,    // Milliseconds, set when attached to the tangle
    attachment_timestamp_lower_bound: i64,
    attachment_timestamp_upper_bound: i64,
    nonce: String, // Proof of work result, 27 trytes
}

impl Transaction {
    // I use this when building a bundle entry before signing
    pub fn new(address: &str, value: i64, tag: &str, timestamp: i64) -> Transaction {
        // A checksum is not part of the on-ledger address. Non-tryte input is kept whole
        // and rejected by to_trytes.
        let address = if address.len() == ADDRESS_LENGTH_WITH_CHECKSUM && is_valid_trytes(address)
        {
            &address[..ADDRESS_LENGTH]
        } else {
            address
        };
        Transaction {
            address: address.to_string(),
            value,
            obsolete_tag: tag.to_string(),
            tag: tag.to_string(),
            timestamp,
            ..Default::default()
        }
    }

    /// Parses 2673 trytes and recomputes the transaction hash
    pub fn from_trytes(trytes: &str) -> Result<Transaction> {
        if trytes.len() != TRANSACTION_LENGTH {
            return Err(TernaryError::length(
                "transaction",
                TRANSACTION_LENGTH,
                trytes.len(),
            ));
        }
        check_trytes(trytes)?;
        if layout::VALUE_PADDING
            .slice(trytes.as_bytes())
            .iter()
            .any(|&c| c != b'9')
        {
            return Err(TernaryError::InvalidTrytes(
                "value field uses more than 33 trits".to_string(),
            ));
        }

        let trits = trytes_to_trits(trytes)?;
        let hash = Curl::new(CurlMode::CurlP81).hash(&trits)?;

        let text = |range: FieldRange| trytes[range.start..range.end()].to_string();
        let number = |range: FieldRange| trits_to_int::<i64>(range.in_trits().slice(&trits));

        Ok(Transaction {
            hash: trits_to_trytes(&hash)?,
            signature_fragments: text(layout::SIGNATURE_FRAGMENTS),
            address: text(layout::ADDRESS),
            value: trits_to_int::<i64>(layout::VALUE_TRITS.slice(&trits)),
            obsolete_tag: text(layout::OBSOLETE_TAG),
            timestamp: number(layout::TIMESTAMP),
            current_index: number(layout::CURRENT_INDEX),
            last_index: number(layout::LAST_INDEX),
            bundle: text(layout::BUNDLE),
            trunk_transaction: text(layout::TRUNK_TRANSACTION),
            branch_transaction: text(layout::BRANCH_TRANSACTION),
            tag: text(layout::TAG),
            attachment_timestamp: number(layout::ATTACHMENT_TIMESTAMP),
            attachment_timestamp_lower_bound: number(layout::ATTACHMENT_TIMESTAMP_LOWER_BOUND),
            attachment_timestamp_upper_bound: number(layout::ATTACHMENT_TIMESTAMP_UPPER_BOUND),
            nonce: text(layout::NONCE),
        })
    }

    /// Serializes every field at its fixed offset, short fields are padded with `9`
    pub fn to_trytes(&self) -> Result<String> {
        let mut trytes = String::with_capacity(TRANSACTION_LENGTH);
        trytes.push_str(&text_field(
            "signature fragment",
            &self.signature_fragments,
            layout::SIGNATURE_FRAGMENTS,
        )?);
        trytes.push_str(&text_field("address", &self.address, layout::ADDRESS)?);
        trytes.push_str(&value_field(self.value)?);
        trytes.push_str(&text_field(
            "obsolete tag",
            &self.obsolete_tag,
            layout::OBSOLETE_TAG,
        )?);
        trytes.push_str(&number_field(self.timestamp, layout::TIMESTAMP)?);
        trytes.push_str(&number_field(self.current_index, layout::CURRENT_INDEX)?);
        trytes.push_str(&number_field(self.last_index, layout::LAST_INDEX)?);
        trytes.push_str(&text_field("bundle", &self.bundle, layout::BUNDLE)?);
        trytes.push_str(&text_field(
            "trunk transaction",
            &self.trunk_transaction,
            layout::TRUNK_TRANSACTION,
        )?);
        trytes.push_str(&text_field(
            "branch transaction",
            &self.branch_transaction,
            layout::BRANCH_TRANSACTION,
        )?);
        trytes.push_str(&text_field("tag", &self.tag, layout::TAG)?);
        trytes.push_str(&number_field(
            self.attachment_timestamp,
            layout::ATTACHMENT_TIMESTAMP,
        )?);
        trytes.push_str(&number_field(
            self.attachment_timestamp_lower_bound,
            layout::ATTACHMENT_TIMESTAMP_LOWER_BOUND,
        )?);
        trytes.push_str(&number_field(
            self.attachment_timestamp_upper_bound,
            layout::ATTACHMENT_TIMESTAMP_UPPER_BOUND,
        )?);
        trytes.push_str(&text_field("nonce", &self.nonce, layout::NONCE)?);
        Ok(trytes)
    }

    /// Curl-P-81 hash of the serialized transaction
    pub fn compute_hash(&self) -> Result<String> {
        let trits = trytes_to_trits(&self.to_trytes()?)?;
        trits_to_trytes(&Curl::new(CurlMode::CurlP81).hash(&trits)?)
    }

    /// The 162 trytes the bundle hash absorbs for this entry
    pub fn bundle_essence(&self) -> Result<String> {
        let mut essence = String::with_capacity(BUNDLE_ESSENCE.length);
        essence.push_str(&text_field("address", &self.address, layout::ADDRESS)?);
        essence.push_str(&value_field(self.value)?);
        essence.push_str(&text_field(
            "obsolete tag",
            &self.obsolete_tag,
            layout::OBSOLETE_TAG,
        )?);
        essence.push_str(&number_field(self.timestamp, layout::TIMESTAMP)?);
        essence.push_str(&number_field(self.current_index, layout::CURRENT_INDEX)?);
        essence.push_str(&number_field(self.last_index, layout::LAST_INDEX)?);
        Ok(essence)
    }

    /// Number of trailing zero trits in the stored hash
    pub fn weight_magnitude(&self) -> Result<usize> {
        let trits = trytes_to_trits(&self.hash)?;
        Ok(trailing_zero_trits(&trits))
    }

    pub fn is_tail(&self) -> bool {
        self.current_index == 0
    }

    pub fn get_hash(&self) -> &str {
        &self.hash
    }

    pub fn set_hash(&mut self, hash: &str) {
        self.hash = hash.to_string();
    }

    pub fn get_signature_fragments(&self) -> &str {
        &self.signature_fragments
    }

    pub fn set_signature_fragments(&mut self, fragments: &str) {
        self.signature_fragments = fragments.to_string();
    }

    pub fn get_address(&self) -> &str {
        &self.address
    }

    pub fn set_address(&mut self, address: &str) {
        self.address = address.to_string();
    }

    pub fn get_value(&self) -> i64 {
        self.value
    }

    pub fn set_value(&mut self, value: i64) {
        self.value = value;
    }

    pub fn get_obsolete_tag(&self) -> &str {
        &self.obsolete_tag
    }

    pub fn set_obsolete_tag(&mut self, tag: &str) {
        self.obsolete_tag = tag.to_string();
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = timestamp;
    }

    pub fn get_current_index(&self) -> i64 {
        self.current_index
    }

    pub fn set_current_index(&mut self, index: i64) {
        self.current_index = index;
    }

    pub fn get_last_index(&self) -> i64 {
        self.last_index
    }

    pub fn set_last_index(&mut self, index: i64) {
        self.last_index = index;
    }

    pub fn get_bundle(&self) -> &str {
        &self.bundle
    }

    pub fn set_bundle(&mut self, bundle: &str) {
        self.bundle = bundle.to_string();
    }

    pub fn get_trunk_transaction(&self) -> &str {
        &self.trunk_transaction
    }

    pub fn set_trunk_transaction(&mut self, hash: &str) {
        self.trunk_transaction = hash.to_string();
    }

    pub fn get_branch_transaction(&self) -> &str {
        &self.branch_transaction
    }

    pub fn set_branch_transaction(&mut self, hash: &str) {
        self.branch_transaction = hash.to_string();
    }

    pub fn get_tag(&self) -> &str {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: &str) {
        self.tag = tag.to_string();
    }

    pub fn get_attachment_timestamp(&self) -> i64 {
        self.attachment_timestamp
    }

    pub fn set_attachment_timestamp(&mut self, timestamp: i64) {
        self.attachment_timestamp = timestamp;
    }

    pub fn get_attachment_timestamp_lower_bound(&self) -> i64 {
        self.attachment_timestamp_lower_bound
    }

    pub fn set_attachment_timestamp_lower_bound(&mut self, timestamp: i64) {
        self.attachment_timestamp_lower_bound = timestamp;
    }

    pub fn get_attachment_timestamp_upper_bound(&self) -> i64 {
        self.attachment_timestamp_upper_bound
    }

    pub fn set_attachment_timestamp_upper_bound(&mut self, timestamp: i64) {
        self.attachment_timestamp_upper_bound = timestamp;
    }

    pub fn get_nonce(&self) -> &str {
        &self.nonce
    }

    pub fn set_nonce(&mut self, nonce: &str) {
        self.nonce = nonce.to_string();
    }

    // Fills references and nonce so the transaction can be serialized before attachment
    pub(crate) fn fill_unset_references(&mut self) {
        if self.trunk_transaction.is_empty() {
            self.trunk_transaction = EMPTY_HASH.to_string();
        }
        if self.branch_transaction.is_empty() {
            self.branch_transaction = EMPTY_HASH.to_string();
        }
        if self.nonce.is_empty() {
            self.nonce = pad_trytes("", layout::NONCE.length);
        }
        if self.signature_fragments.is_empty() {
            self.signature_fragments = pad_trytes("", SIGNATURE_FRAGMENT_LENGTH);
        }
    }
}

pub(crate) fn trailing_zero_trits(trits: &[Trit]) -> usize {
    trits.iter().rev().take_while(|&&t| t == 0).count()
}

fn text_field(what: &'static str, value: &str, range: FieldRange) -> Result<String> {
    if value.len() > range.length {
        return Err(TernaryError::length(what, range.length, value.len()));
    }
    check_trytes(value)?;
    Ok(pad_trytes(value, range.length))
}

fn number_field(value: i64, range: FieldRange) -> Result<String> {
    let trits = int_to_trits_padded(value, range.length * TRITS_PER_TRYTE)?;
    trits_to_trytes(&trits)
}

fn value_field(value: i64) -> Result<String> {
    // Checks the value fits the 33 significant trits before widening
    let mut trits: Trits = int_to_trits_padded(value, layout::VALUE_TRITS.length)?;
    trits.resize(layout::VALUE.length * TRITS_PER_TRYTE, 0);
    trits_to_trytes(&trits)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str =
        "RGVOWCDJAGSUSEPGFRTRAJYHFHZXJCPGFMEWYHSHVFUIFBKHGSBNGILWTSDKSNXICNJCOPFMAAZHCHJQD";
    const TAG: &str = "TERNARYCHAIN99999999999999";

    fn sample_transaction() -> Transaction {
        let mut trx = Transaction::new(ADDRESS, -1500, TAG, 1_700_000_000);
        trx.set_current_index(1);
        trx.set_last_index(3);
        trx.set_bundle(EMPTY_HASH);
        trx.set_attachment_timestamp(1_700_000_000_123);
        trx.set_attachment_timestamp_upper_bound(3_812_798_742_493);
        trx.fill_unset_references();
        trx
    }

    #[test]
    fn test_layout_is_contiguous() {
        let fields = [
            layout::SIGNATURE_FRAGMENTS,
            layout::ADDRESS,
            layout::VALUE,
            layout::OBSOLETE_TAG,
            layout::TIMESTAMP,
            layout::CURRENT_INDEX,
            layout::LAST_INDEX,
            layout::BUNDLE,
            layout::TRUNK_TRANSACTION,
            layout::BRANCH_TRANSACTION,
            layout::TAG,
            layout::ATTACHMENT_TIMESTAMP,
            layout::ATTACHMENT_TIMESTAMP_LOWER_BOUND,
            layout::ATTACHMENT_TIMESTAMP_UPPER_BOUND,
            layout::NONCE,
        ];
        let mut expected_start = 0;
        for field in fields {
            assert_eq!(field.start, expected_start);
            expected_start = field.end();
        }
        assert_eq!(expected_start, TRANSACTION_LENGTH);
        assert_eq!(layout::VALUE.in_trits().start, layout::VALUE_TRITS.start);
        assert_eq!(layout::TIMESTAMP.in_trits().start, 6966);
        assert_eq!(layout::ATTACHMENT_TIMESTAMP.in_trits().start, 7857);
        assert_eq!(layout::ATTACHMENT_TIMESTAMP_UPPER_BOUND.in_trits().end(), 7938);
        assert_eq!(BUNDLE_ESSENCE.length, 162);
        assert_eq!(POW_PREFIX_TRITS, 7776);
    }

    #[test]
    fn test_serialize_and_parse() {
        let trx = sample_transaction();
        let trytes = trx.to_trytes().unwrap();
        assert_eq!(trytes.len(), TRANSACTION_LENGTH);
        assert_eq!(&trytes[2187..2268], ADDRESS);
        assert_eq!(&trytes[2592..2619], format!("{TAG}9"));

        let parsed = Transaction::from_trytes(&trytes).unwrap();
        assert_eq!(parsed.get_address(), ADDRESS);
        assert_eq!(parsed.get_value(), -1500);
        assert_eq!(parsed.get_timestamp(), 1_700_000_000);
        assert_eq!(parsed.get_current_index(), 1);
        assert_eq!(parsed.get_last_index(), 3);
        assert_eq!(parsed.get_attachment_timestamp(), 1_700_000_000_123);
        assert_eq!(parsed.get_attachment_timestamp_lower_bound(), 0);
        assert_eq!(
            parsed.get_attachment_timestamp_upper_bound(),
            3_812_798_742_493
        );
        assert_eq!(parsed.get_trunk_transaction(), EMPTY_HASH);
        assert_eq!(parsed.get_hash(), trx.compute_hash().unwrap());
        assert_eq!(parsed.to_trytes().unwrap(), trytes);
    }

    #[test]
    fn test_bundle_essence_matches_layout() {
        let trx = sample_transaction();
        let trytes = trx.to_trytes().unwrap();
        let essence = trx.bundle_essence().unwrap();
        assert_eq!(essence.len(), 162);
        assert_eq!(essence, &trytes[BUNDLE_ESSENCE.start..BUNDLE_ESSENCE.end()]);
    }

    #[test]
    fn test_rejects_malformed_trytes() {
        assert!(matches!(
            Transaction::from_trytes("ABC"),
            Err(TernaryError::InvalidLength { .. })
        ));

        let mut trytes = sample_transaction().to_trytes().unwrap();
        trytes.replace_range(2280..2281, "A");
        assert!(matches!(
            Transaction::from_trytes(&trytes),
            Err(TernaryError::InvalidTrytes(_))
        ));

        let lowercase = "a".repeat(TRANSACTION_LENGTH);
        assert!(Transaction::from_trytes(&lowercase).is_err());
    }

    #[test]
    fn test_field_overflow() {
        let mut trx = sample_transaction();
        trx.set_tag(&"A".repeat(28));
        assert!(trx.to_trytes().is_err());

        let mut trx = sample_transaction();
        trx.set_value(i64::MAX);
        assert!(trx.to_trytes().is_err());
    }

    #[test]
    fn test_address_checksum_is_dropped() {
        let with_checksum = format!("{ADDRESS}ABCDEFGHI");
        let trx = Transaction::new(&with_checksum, 0, "", 0);
        assert_eq!(trx.get_address(), ADDRESS);
        assert!(trx.is_tail());
    }

    #[test]
    fn test_non_tryte_address_is_kept_whole() {
        let address = format!("{}é{}", "A".repeat(80), "A".repeat(8));
        let trx = Transaction::new(&address, 0, "", 0);
        assert_eq!(trx.get_address(), address);
        assert!(trx.to_trytes().is_err());
    }

    #[test]
    fn test_weight_magnitude() {
        let mut trx = sample_transaction();
        let mut hash = "M".repeat(78);
        hash.push_str("999");
        trx.set_hash(&hash);
        assert_eq!(trx.weight_magnitude().unwrap(), 9);
    }
}
