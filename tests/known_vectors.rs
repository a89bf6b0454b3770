//! Fixed inputs with their expected outputs
//!
//! The transaction fixture is a complete 2673-tryte slot: a text message, a 1500
//! output, references, attachment timestamps and a nonce.

use ternary_chain::crypto::add_checksum;
use ternary_chain::trinary::trytes_to_string;
use ternary_chain::{Seed, Transaction};

const TRANSACTION: &str = include_str!("fixtures/transaction.trytes");
const TRANSACTION_HASH: &str =
    "XYZGGXYITBPUGNHFNWHLYXMJBOTMPAJPFXDVOBT9HFNV9ZMLFFLXIWKPWBMRUVML9QFHHPWLFXJFOZHHR";

const SEED: &str =
    "SEEDSEEDSEEDSEEDSEEDSEEDSEEDSEEDSEEDSEEDSEEDSEEDSEEDSEEDSEEDSEEDSEEDSEEDSEEDSEED9";

#[test]
fn test_transaction_fixture_hash() {
    let trytes = TRANSACTION.trim();
    let trx = Transaction::from_trytes(trytes).unwrap();
    assert_eq!(trx.get_hash(), TRANSACTION_HASH);
    assert_eq!(trx.compute_hash().unwrap(), TRANSACTION_HASH);
    assert_eq!(trx.to_trytes().unwrap(), trytes);
}

#[test]
fn test_transaction_fixture_fields() {
    let trx = Transaction::from_trytes(TRANSACTION.trim()).unwrap();
    assert_eq!(
        trx.get_address(),
        "RGVOWCDJAGSUSEPGFRTRAJYHFHZXJCPGFMEWYHSHVFUIFBKHGSBNGILWTSDKSNXICNJCOPFMAAZHCHJQD"
    );
    assert_eq!(trx.get_value(), 1500);
    assert_eq!(trx.get_timestamp(), 1_700_000_000);
    assert!(trx.is_tail());
    assert_eq!(trx.get_last_index(), 1);
    assert_eq!(trx.get_tag(), "TERNARYCHAIN999999999999999");
    assert_eq!(trx.get_attachment_timestamp(), 1_700_000_000_123);
    assert_eq!(trx.get_attachment_timestamp_lower_bound(), 0);
    assert_eq!(trx.get_attachment_timestamp_upper_bound(), 3_812_798_742_493);
    assert_eq!(trx.get_nonce(), "NONCE9999999999999999999999");

    let message = trx.get_signature_fragments().trim_end_matches('9');
    assert_eq!(
        trytes_to_string(message).unwrap(),
        "Ternary chain fixture transaction"
    );
}

#[test]
fn test_seed_address_fixture() {
    let seed = Seed::new(SEED, 1).unwrap();
    let mut address = seed.new_address(0, false).unwrap();
    assert_eq!(
        address.get_address(),
        "REZIPTYKXPJQWSFQTWDHIZVLIDBEX9IQMV9RBMQSSBPFIWREIDQJWFVNJKMDV9OJKFZSFBELF9KOIGO9Z"
    );
    assert_eq!(address.get_checksum().unwrap(), "QXEXWQXOB");
    assert_eq!(
        add_checksum(address.get_address()).unwrap(),
        address.get_address_with_checksum().unwrap()
    );

    let seed = Seed::new(SEED, 2).unwrap();
    assert_eq!(
        seed.new_address(2, false).unwrap().get_address(),
        "LJDDBF9OSIWWRHISGKJYNEIKQURWXAKPIOFYPWRFSRGRIFOLK9YYKNIJQNJZEAYROIZRSTDOUUHKUHGOY"
    );
}
