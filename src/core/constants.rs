/// Fixed protocol constants
///
/// These values are part of the wire format shared with node software. Changing any of
/// them breaks interoperability, so they live in one place and nothing recomputes them.
///
/// ## Units
/// - **Trit**: one balanced ternary digit
/// - **Tryte**: three trits, written as one character of `TRYTE_ALPHABET`
/// - **Hash**: 243 trits, 81 trytes, 48 bytes once bridged through the big integer
///
/// Radix-27 alphabet, `9` is the zero tryte
pub const TRYTE_ALPHABET: &str = "9ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const TRYTE_SPACE: usize = 27;
pub const TRITS_PER_TRYTE: usize = 3;

/// Hash width in trits (one sponge rate)
pub const HASH_LENGTH_TRITS: usize = 243;
/// Hash width in trytes
pub const HASH_LENGTH: usize = 81;
/// Hash width in bytes
pub const BYTE_HASH_LENGTH: usize = 48;

pub const ADDRESS_LENGTH: usize = 81;
pub const CHECKSUM_LENGTH: usize = 9;
pub const ADDRESS_LENGTH_WITH_CHECKSUM: usize = ADDRESS_LENGTH + CHECKSUM_LENGTH;

pub const SEED_LENGTH: usize = 81;
pub const TAG_LENGTH: usize = 27;
pub const NONCE_LENGTH: usize = 27;

/// Number of 243-trit chunks in one key fragment
pub const FRAGMENT_LENGTH: usize = 27;
/// Trits in one key/signature fragment (27 * 243)
pub const KEY_FRAGMENT_LENGTH: usize = FRAGMENT_LENGTH * HASH_LENGTH_TRITS;
/// Trytes in one signature/message fragment
pub const SIGNATURE_FRAGMENT_LENGTH: usize = KEY_FRAGMENT_LENGTH / TRITS_PER_TRYTE;

pub const TRANSACTION_LENGTH: usize = 2673;
pub const TRANSACTION_LENGTH_TRITS: usize = TRANSACTION_LENGTH * TRITS_PER_TRYTE;

/// Normalized bundle values live in [-MAX_TRYTE_VALUE, MAX_TRYTE_VALUE]
pub const MAX_TRYTE_VALUE: i8 = 13;

pub const MIN_SECURITY_LEVEL: u8 = 1;
pub const MAX_SECURITY_LEVEL: u8 = 3;

/// All-zero 81-tryte hash used for unset trunk/branch references
pub const EMPTY_HASH: &str =
    "999999999999999999999999999999999999999999999999999999999999999999999999999999999";

/// Validates a security level, shared by every derivation entry point
pub fn check_security(security: u8) -> crate::error::Result<u8> {
    if (MIN_SECURITY_LEVEL..=MAX_SECURITY_LEVEL).contains(&security) {
        Ok(security)
    } else {
        Err(crate::error::TernaryError::InvalidSecurityLevel(
            security as i64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_lengths() {
        assert_eq!(KEY_FRAGMENT_LENGTH, 6561);
        assert_eq!(SIGNATURE_FRAGMENT_LENGTH, 2187);
        assert_eq!(TRANSACTION_LENGTH_TRITS, 8019);
        assert_eq!(EMPTY_HASH.len(), HASH_LENGTH);
        assert_eq!(TRYTE_ALPHABET.len(), TRYTE_SPACE);
    }

    #[test]
    fn test_security_bounds() {
        assert!(check_security(0).is_err());
        assert_eq!(check_security(1).unwrap(), 1);
        assert_eq!(check_security(3).unwrap(), 3);
        assert!(check_security(4).is_err());
    }
}
