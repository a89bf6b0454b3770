//! Balanced ternary encoding
//!
//! Conversions between trits, trytes, integers, ASCII and the 48-byte form hashes take
//! when they pass through Keccak.

pub mod big_int;
pub mod codec;

pub use big_int::{bytes_to_trits, trits_to_bytes, BigInt384};
pub use codec::{
    add_to_trits, check_trytes, int_to_trits, int_to_trits_padded, is_valid_hash,
    is_valid_trit, is_valid_trits, is_valid_trytes, is_valid_trytes_of_len, pad_trytes,
    string_to_trytes, trits_to_int, trits_to_trytes, trits_to_trytes_len, tryte_to_trits,
    tryte_value, trytes_to_string, trytes_to_trits, Trit, Trits,
};
