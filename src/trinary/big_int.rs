//! 384-bit bridge between 243-trit hashes and 48-byte digests
//!
//! Twelve 32-bit words in two's complement, least significant word first. The value
//! only exists while a hash crosses between the ternary and binary worlds, it is never
//! stored.

use crate::core::constants::{BYTE_HASH_LENGTH, HASH_LENGTH_TRITS};
use crate::error::{Result, TernaryError};
use crate::trinary::codec::{is_valid_trits, Trit, Trits};
use std::cmp::Ordering;

const WORDS: usize = 12;

/// (3^242 - 1) / 2, the largest value 242 balanced trits can hold
pub const HALF_3: [u32; WORDS] = [
    0xa5ce8964, 0x9f007669, 0x1484504f, 0x3ade00d9, 0x0c24486e, 0x50979d57, 0x79a4c702,
    0x48bbae36, 0xa9f6808b, 0xaa06a805, 0xa87fabdf, 0x5e69ebef,
];

/// Two's complement of `HALF_3`
pub const NEG_HALF_3: [u32; WORDS] = [
    0x5a31769c, 0x60ff8996, 0xeb7bafb0, 0xc521ff26, 0xf3dbb791, 0xaf6862a8, 0x865b38fd,
    0xb74451c9, 0x56097f74, 0x55f957fa, 0x57805420, 0xa1961410,
];

/// 3^242, the weight of the trit a 384-bit value cannot carry
pub const LAST_TRIT: [u32; WORDS] = [
    0x4b9d12c9, 0x3e00ecd3, 0x2908a09f, 0x75bc01b2, 0x184890dc, 0xa12f3aae, 0xf3498e04,
    0x91775c6c, 0x53ed0116, 0x540d500b, 0x50ff57bf, 0xbcd3d7df,
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BigInt384 {
    words: [u32; WORDS],
}

impl BigInt384 {
    pub const fn from_words(words: [u32; WORDS]) -> Self {
        BigInt384 { words }
    }

    pub fn get_words(&self) -> &[u32; WORDS] {
        &self.words
    }

    pub fn is_negative(&self) -> bool {
        self.words[WORDS - 1] >> 31 != 0
    }

    /// Reads 243 balanced trits. The top trit is ignored, 384 bits cannot hold it.
    pub fn from_trits(trits: &[Trit]) -> Result<Self> {
        if trits.len() != HASH_LENGTH_TRITS {
            return Err(TernaryError::length(
                "hash trit",
                HASH_LENGTH_TRITS,
                trits.len(),
            ));
        }
        if !is_valid_trits(trits) {
            return Err(TernaryError::InvalidTrits(
                "hash contains a value outside {-1, 0, 1}".to_string(),
            ));
        }

        let mut value = BigInt384::default();
        for &trit in trits[..HASH_LENGTH_TRITS - 1].iter().rev() {
            value.mul_add_small(3, (trit + 1) as u32);
        }
        // Unbalanced digits to balanced
        value.wrapping_sub(&HALF_3);
        Ok(value)
    }

    /// Balanced trits of the value, the 243rd trit is always zero
    pub fn to_trits(&self) -> Trits {
        let mut value = *self;

        // Fold out of range values back into what 242 trits can express
        if value.is_negative() {
            if value.cmp_unsigned(&NEG_HALF_3) == Ordering::Less {
                value.wrapping_add(&LAST_TRIT);
            }
        } else if value.cmp_unsigned(&HALF_3) == Ordering::Greater {
            value.wrapping_sub(&LAST_TRIT);
        }

        // Same as adding HALF_3
        value.wrapping_sub(&NEG_HALF_3);

        let mut trits = vec![0; HASH_LENGTH_TRITS];
        for trit in trits.iter_mut().take(HASH_LENGTH_TRITS - 1) {
            *trit = value.div_small(3) as Trit - 1;
        }
        trits
    }

    /// Big-endian: most significant word first, each word big-endian
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != BYTE_HASH_LENGTH {
            return Err(TernaryError::length(
                "hash byte",
                BYTE_HASH_LENGTH,
                bytes.len(),
            ));
        }
        let mut words = [0u32; WORDS];
        for (i, chunk) in bytes.chunks_exact(4).enumerate() {
            words[WORDS - 1 - i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(BigInt384 { words })
    }

    pub fn to_bytes(&self) -> [u8; BYTE_HASH_LENGTH] {
        let mut bytes = [0u8; BYTE_HASH_LENGTH];
        for (i, chunk) in bytes.chunks_exact_mut(4).enumerate() {
            chunk.copy_from_slice(&self.words[WORDS - 1 - i].to_be_bytes());
        }
        bytes
    }

    fn cmp_unsigned(&self, other: &[u32; WORDS]) -> Ordering {
        self.words.iter().rev().cmp(other.iter().rev())
    }

    fn wrapping_add(&mut self, other: &[u32; WORDS]) {
        let mut carry = 0u64;
        for (word, &addend) in self.words.iter_mut().zip(other.iter()) {
            let sum = *word as u64 + addend as u64 + carry;
            *word = sum as u32;
            carry = sum >> 32;
        }
    }

    fn wrapping_sub(&mut self, other: &[u32; WORDS]) {
        // a - b == a + !b + 1
        let mut carry = 1u64;
        for (word, &subtrahend) in self.words.iter_mut().zip(other.iter()) {
            let sum = *word as u64 + (!subtrahend) as u64 + carry;
            *word = sum as u32;
            carry = sum >> 32;
        }
    }

    fn mul_add_small(&mut self, factor: u32, addend: u32) {
        let mut carry = addend as u64;
        for word in self.words.iter_mut() {
            let product = *word as u64 * factor as u64 + carry;
            *word = product as u32;
            carry = product >> 32;
        }
    }

    /// Unsigned division in place, returns the remainder
    fn div_small(&mut self, divisor: u32) -> u32 {
        let mut remainder = 0u64;
        for word in self.words.iter_mut().rev() {
            let current = (remainder << 32) | *word as u64;
            *word = (current / divisor as u64) as u32;
            remainder = current % divisor as u64;
        }
        remainder as u32
    }
}

impl From<i64> for BigInt384 {
    fn from(value: i64) -> Self {
        let fill = if value < 0 { u32::MAX } else { 0 };
        let mut words = [fill; WORDS];
        words[0] = value as u32;
        words[1] = (value >> 32) as u32;
        BigInt384 { words }
    }
}

/// 243 trits to the 48-byte form Keccak consumes
pub fn trits_to_bytes(trits: &[Trit]) -> Result<[u8; BYTE_HASH_LENGTH]> {
    Ok(BigInt384::from_trits(trits)?.to_bytes())
}

/// 48 bytes back to 243 trits, top trit zero
pub fn bytes_to_trits(bytes: &[u8]) -> Result<Trits> {
    Ok(BigInt384::from_bytes(bytes)?.to_trits())
}
