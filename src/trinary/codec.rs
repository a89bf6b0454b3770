use crate::core::constants::{HASH_LENGTH, TRITS_PER_TRYTE, TRYTE_ALPHABET, TRYTE_SPACE};
use crate::error::{Result, TernaryError};
use std::ops::{Add, Mul};

/// One balanced ternary digit, always in {-1, 0, 1}
pub type Trit = i8;

/// Owned trit sequence
pub type Trits = Vec<Trit>;

// Indexed by position in TRYTE_ALPHABET, least significant trit first
const TRYTE_TO_TRITS: [[Trit; 3]; TRYTE_SPACE] = [
    [0, 0, 0],
    [1, 0, 0],
    [-1, 1, 0],
    [0, 1, 0],
    [1, 1, 0],
    [-1, -1, 1],
    [0, -1, 1],
    [1, -1, 1],
    [-1, 0, 1],
    [0, 0, 1],
    [1, 0, 1],
    [-1, 1, 1],
    [0, 1, 1],
    [1, 1, 1],
    [-1, -1, -1],
    [0, -1, -1],
    [1, -1, -1],
    [-1, 0, -1],
    [0, 0, -1],
    [1, 0, -1],
    [-1, 1, -1],
    [0, 1, -1],
    [1, 1, -1],
    [-1, -1, 0],
    [0, -1, 0],
    [1, -1, 0],
    [-1, 0, 0],
];

fn alphabet_index(tryte: char) -> Option<usize> {
    match tryte {
        '9' => Some(0),
        'A'..='Z' => Some(tryte as usize - 'A' as usize + 1),
        _ => None,
    }
}

fn alphabet_char(index: usize) -> char {
    TRYTE_ALPHABET.as_bytes()[index % TRYTE_SPACE] as char
}

pub fn is_valid_trit(trit: Trit) -> bool {
    (-1..=1).contains(&trit)
}

pub fn is_valid_trits(trits: &[Trit]) -> bool {
    trits.iter().all(|&t| is_valid_trit(t))
}

pub fn is_valid_trytes(trytes: &str) -> bool {
    trytes.chars().all(|c| alphabet_index(c).is_some())
}

/// Tryte string of exactly `length` characters
pub fn is_valid_trytes_of_len(trytes: &str, length: usize) -> bool {
    trytes.len() == length && is_valid_trytes(trytes)
}

/// 81-tryte hash
pub fn is_valid_hash(trytes: &str) -> bool {
    is_valid_trytes_of_len(trytes, HASH_LENGTH)
}

/// Fails with `InvalidTrytes` naming the first bad character
pub fn check_trytes(trytes: &str) -> Result<()> {
    match trytes.chars().position(|c| alphabet_index(c).is_none()) {
        None => Ok(()),
        Some(pos) => Err(TernaryError::InvalidTrytes(format!(
            "unexpected character at position {pos}"
        ))),
    }
}

/// Three trits for a single tryte, `None` outside the alphabet
pub fn tryte_to_trits(tryte: char) -> Option<[Trit; 3]> {
    alphabet_index(tryte).map(|index| TRYTE_TO_TRITS[index])
}

/// Signed value of one tryte, in [-13, 13]
pub fn tryte_value(tryte: char) -> Option<i8> {
    tryte_to_trits(tryte).map(|trits| trits_to_int::<i8>(&trits))
}

pub fn trytes_to_trits(trytes: &str) -> Result<Trits> {
    let mut trits = Vec::with_capacity(trytes.len() * TRITS_PER_TRYTE);
    for (pos, tryte) in trytes.chars().enumerate() {
        let group = tryte_to_trits(tryte).ok_or_else(|| {
            TernaryError::InvalidTrytes(format!("'{tryte}' at position {pos}"))
        })?;
        trits.extend_from_slice(&group);
    }
    Ok(trits)
}

pub fn trits_to_trytes(trits: &[Trit]) -> Result<String> {
    trits_to_trytes_len(trits, trits.len())
}

/// Converts only the first `length` trits
pub fn trits_to_trytes_len(trits: &[Trit], length: usize) -> Result<String> {
    if length > trits.len() {
        return Err(TernaryError::length("trit sequence", length, trits.len()));
    }
    if length % TRITS_PER_TRYTE != 0 {
        return Err(TernaryError::InvalidTrits(format!(
            "length {length} is not a multiple of {TRITS_PER_TRYTE}"
        )));
    }

    let mut trytes = String::with_capacity(length / TRITS_PER_TRYTE);
    for group in trits[..length].chunks_exact(TRITS_PER_TRYTE) {
        if let Some(bad) = group.iter().find(|&&t| !is_valid_trit(t)) {
            return Err(TernaryError::InvalidTrits(format!("trit value {bad}")));
        }
        let mut index = group[0] as i32 + 3 * group[1] as i32 + 9 * group[2] as i32;
        if index < 0 {
            index += TRYTE_SPACE as i32;
        }
        trytes.push(alphabet_char(index as usize));
    }
    Ok(trytes)
}

/// Balanced ternary digits of `value`, least significant first. Zero has no digits.
pub fn int_to_trits(value: i64) -> Trits {
    let mut trits = Trits::new();
    let mut magnitude = value.unsigned_abs();
    let sign: Trit = if value < 0 { -1 } else { 1 };

    while magnitude != 0 {
        let mut remainder = (magnitude % 3) as Trit;
        magnitude /= 3;
        if remainder > 1 {
            remainder = -1;
            magnitude += 1;
        }
        trits.push(remainder * sign);
    }
    trits
}

/// Like `int_to_trits` but right-padded with zeros to exactly `length` trits
pub fn int_to_trits_padded(value: i64, length: usize) -> Result<Trits> {
    let mut trits = int_to_trits(value);
    if trits.len() > length {
        return Err(TernaryError::InvalidTrits(format!(
            "{value} needs {} trits, field holds {length}",
            trits.len()
        )));
    }
    trits.resize(length, 0);
    Ok(trits)
}

/// Evaluates trits as a base-3 number, least significant first
pub fn trits_to_int<T>(trits: &[Trit]) -> T
where
    T: From<i8> + Add<Output = T> + Mul<Output = T> + Copy,
{
    let three = T::from(3);
    trits
        .iter()
        .rev()
        .fold(T::from(0), |acc, &trit| acc * three + T::from(trit))
}

/// Adds `value` to a trit counter in place, dropping any carry out of the top trit
pub fn add_to_trits(trits: &mut [Trit], value: i64) {
    let addend = int_to_trits(value);
    let mut carry: Trit = 0;
    for (i, trit) in trits.iter_mut().enumerate() {
        let digit = addend.get(i).copied().unwrap_or(0);
        if digit == 0 && carry == 0 && i >= addend.len() {
            break;
        }
        let (sum, next) = match *trit + digit + carry {
            3 => (0, 1),
            2 => (-1, 1),
            -2 => (1, -1),
            -3 => (0, -1),
            sum => (sum, 0),
        };
        *trit = sum;
        carry = next;
    }
}

/// Two trytes per byte, low digit first
pub fn string_to_trytes(input: &str) -> String {
    let mut trytes = String::with_capacity(input.len() * 2);
    for byte in input.bytes() {
        let byte = byte as usize;
        trytes.push(alphabet_char(byte % TRYTE_SPACE));
        trytes.push(alphabet_char(byte / TRYTE_SPACE));
    }
    trytes
}

pub fn trytes_to_string(trytes: &str) -> Result<String> {
    if trytes.len() % 2 != 0 {
        return Err(TernaryError::InvalidTrytes(format!(
            "odd length {} cannot encode bytes",
            trytes.len()
        )));
    }
    check_trytes(trytes)?;

    let mut bytes = Vec::with_capacity(trytes.len() / 2);
    for pair in trytes.as_bytes().chunks_exact(2) {
        // Both characters were checked above
        let low = alphabet_index(pair[0] as char).unwrap_or(0);
        let high = alphabet_index(pair[1] as char).unwrap_or(0);
        let value = low + high * TRYTE_SPACE;
        let byte = u8::try_from(value).map_err(|_| {
            TernaryError::InvalidTrytes(format!("pair decodes to {value}, above one byte"))
        })?;
        bytes.push(byte);
    }
    String::from_utf8(bytes).map_err(|e| TernaryError::Serialization(e.to_string()))
}

/// Right-pads a tryte string with `9` up to `length`
pub fn pad_trytes(trytes: &str, length: usize) -> String {
    let mut padded = String::with_capacity(length.max(trytes.len()));
    padded.push_str(trytes);
    while padded.len() < length {
        padded.push('9');
    }
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryte_table() {
        assert_eq!(tryte_to_trits('9'), Some([0, 0, 0]));
        assert_eq!(tryte_to_trits('A'), Some([1, 0, 0]));
        assert_eq!(tryte_to_trits('M'), Some([1, 1, 1]));
        assert_eq!(tryte_to_trits('N'), Some([-1, -1, -1]));
        assert_eq!(tryte_to_trits('Z'), Some([-1, 0, 0]));
        assert_eq!(tryte_to_trits('a'), None);
        assert_eq!(tryte_to_trits('0'), None);
    }

    #[test]
    fn test_tryte_values() {
        assert_eq!(tryte_value('9'), Some(0));
        assert_eq!(tryte_value('M'), Some(13));
        assert_eq!(tryte_value('N'), Some(-13));
        assert_eq!(tryte_value('Z'), Some(-1));
    }

    #[test]
    fn test_trytes_round_trip() {
        let trytes = "ABCDEFGHIJKLMNOPQRSTUVWXYZ9";
        let trits = trytes_to_trits(trytes).unwrap();
        assert_eq!(trits.len(), 81);
        assert_eq!(trits_to_trytes(&trits).unwrap(), trytes);
    }

    #[test]
    fn test_empty_input() {
        assert!(trytes_to_trits("").unwrap().is_empty());
        assert_eq!(trits_to_trytes(&[]).unwrap(), "");
        assert!(int_to_trits(0).is_empty());
        assert_eq!(trits_to_int::<i64>(&[]), 0);
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            trytes_to_trits("AB1"),
            Err(TernaryError::InvalidTrytes(_))
        ));
        assert!(matches!(
            trits_to_trytes(&[0, 2, 0]),
            Err(TernaryError::InvalidTrits(_))
        ));
        assert!(trits_to_trytes(&[0, 1]).is_err());
        assert!(trits_to_trytes_len(&[0, 1, 0], 6).is_err());
    }

    #[test]
    fn test_partial_conversion() {
        let trits = trytes_to_trits("ABC").unwrap();
        assert_eq!(trits_to_trytes_len(&trits, 6).unwrap(), "AB");
    }

    #[test]
    fn test_int_conversion() {
        assert_eq!(int_to_trits(42), vec![0, -1, -1, -1, 1]);
        assert_eq!(int_to_trits(-42), vec![0, 1, 1, 1, -1]);
        for value in [-100_000i64, -13, -1, 1, 2, 13, 14, 1_234_567_890] {
            assert_eq!(trits_to_int::<i64>(&int_to_trits(value)), value);
        }
        let padded = int_to_trits_padded(5, 27).unwrap();
        assert_eq!(padded.len(), 27);
        assert_eq!(trits_to_int::<i64>(&padded), 5);
        assert!(int_to_trits_padded(1_000_000, 3).is_err());
    }

    #[test]
    fn test_int_extremes() {
        let trits = int_to_trits(i64::MAX);
        assert_eq!(trits_to_int::<i128>(&trits), i64::MAX as i128);
        let trits = int_to_trits(i64::MIN);
        assert_eq!(trits_to_int::<i128>(&trits), i64::MIN as i128);
    }

    #[test]
    fn test_add_to_trits() {
        let mut counter = vec![0; 9];
        add_to_trits(&mut counter, 1);
        assert_eq!(trits_to_int::<i64>(&counter), 1);
        add_to_trits(&mut counter, 40);
        assert_eq!(trits_to_int::<i64>(&counter), 41);

        // 9 trits hold at most 9841, the carry wraps around
        let mut counter = vec![1; 9];
        add_to_trits(&mut counter, 1);
        assert_eq!(trits_to_int::<i64>(&counter), -9841);
    }

    #[test]
    fn test_string_conversion() {
        assert_eq!(string_to_trytes("IOTA"), "SBYBCCKB");
        assert_eq!(trytes_to_string("SBYBCCKB").unwrap(), "IOTA");
        assert_eq!(trytes_to_string("").unwrap(), "");
        assert!(trytes_to_string("SBY").is_err());
        // 26 + 26 * 27 does not fit in a byte
        assert!(trytes_to_string("ZZ").is_err());
    }

    #[test]
    fn test_validation_helpers() {
        assert!(is_valid_trytes("ABC9"));
        assert!(!is_valid_trytes("abc"));
        assert!(is_valid_hash(crate::core::constants::EMPTY_HASH));
        assert!(!is_valid_hash("ABC"));
        assert!(is_valid_trits(&[-1, 0, 1]));
        assert!(!is_valid_trits(&[-2]));
        assert_eq!(pad_trytes("AB", 4), "AB99");
        assert_eq!(pad_trytes("ABCDE", 4), "ABCDE");
    }
}
