//! Property tests for the ternary encodings
//!
//! Every conversion pair has to be lossless over its whole valid domain, not just
//! the fixtures the unit tests pin down.

use proptest::prelude::*;
use ternary_chain::trinary::{
    add_to_trits, bytes_to_trits, int_to_trits, int_to_trits_padded, string_to_trytes,
    trits_to_bytes, trits_to_int, trits_to_trytes, trytes_to_string, trytes_to_trits, Trit,
    Trits,
};

fn trit() -> impl Strategy<Value = Trit> {
    prop_oneof![Just(-1i8), Just(0i8), Just(1i8)]
}

fn tryte_string(max_len: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[9A-Z]{{0,{max_len}}}"))
        .expect("tryte regex compiles")
}

// 242 free trits, the top one stays zero since 384 bits cannot carry it
fn hash_trits() -> impl Strategy<Value = Trits> {
    prop::collection::vec(trit(), 242).prop_map(|mut trits| {
        trits.push(0);
        trits
    })
}

proptest! {
    #[test]
    fn test_trytes_trits_round_trip(trytes in tryte_string(200)) {
        let trits = trytes_to_trits(&trytes).unwrap();
        prop_assert_eq!(trits.len(), trytes.len() * 3);
        prop_assert_eq!(trits_to_trytes(&trits).unwrap(), trytes);
    }

    #[test]
    fn test_trits_trytes_round_trip(trits in prop::collection::vec(trit(), 0..100)) {
        let whole = trits.len() / 3 * 3;
        let trytes = trits_to_trytes(&trits[..whole]).unwrap();
        prop_assert_eq!(trytes_to_trits(&trytes).unwrap(), trits[..whole].to_vec());
    }

    #[test]
    fn test_int_round_trip(value in -(1i64 << 62)..(1i64 << 62)) {
        let trits = int_to_trits(value);
        prop_assert_eq!(trits_to_int::<i64>(&trits), value);

        let padded = int_to_trits_padded(value, 81).unwrap();
        prop_assert_eq!(padded.len(), 81);
        prop_assert_eq!(trits_to_int::<i64>(&padded), value);
    }

    #[test]
    fn test_add_matches_integer_addition(base in -1_000_000i64..1_000_000, delta in -1_000_000i64..1_000_000) {
        let mut trits = int_to_trits_padded(base, 27).unwrap();
        add_to_trits(&mut trits, delta);
        prop_assert_eq!(trits_to_int::<i64>(&trits), base + delta);
    }

    #[test]
    fn test_bytes_round_trip(trits in hash_trits()) {
        let bytes = trits_to_bytes(&trits).unwrap();
        prop_assert_eq!(bytes_to_trits(&bytes).unwrap(), trits);
    }

    #[test]
    fn test_ascii_round_trip(text in "[ -~]{0,64}") {
        let trytes = string_to_trytes(&text);
        prop_assert_eq!(trytes.len(), text.len() * 2);
        prop_assert_eq!(trytes_to_string(&trytes).unwrap(), text);
    }
}
