use crate::core::constants::{SIGNATURE_FRAGMENT_LENGTH, TAG_LENGTH};
use crate::core::{Bundle, Transaction};
use crate::crypto::is_valid_checksum;
use crate::error::Result;
use crate::trinary::{check_trytes, is_valid_hash, is_valid_trytes, pad_trytes};
use serde::{Deserialize, Serialize};

/// One output of a transfer: who gets what, with an optional message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    address: String,
    value: i64,
    message: String,
    tag: String,
}

impl Transfer {
    pub fn new(address: &str, value: i64, message: &str, tag: &str) -> Transfer {
        Transfer {
            address: address.to_string(),
            value,
            message: message.to_string(),
            tag: tag.to_string(),
        }
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

    pub fn get_message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    pub fn get_tag(&self) -> &str {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: &str) {
        self.tag = tag.to_string();
    }

    /// Address is a hash or checksummed, message is trytes, tag is exactly 27 trytes
    pub fn is_valid(&self) -> bool {
        let address_ok = is_valid_hash(&self.address) || is_valid_checksum(&self.address);
        address_ok
            && is_valid_trytes(&self.message)
            && is_valid_trytes(&self.tag)
            && self.tag.len() == TAG_LENGTH
    }

    /// Number of bundle slots the message needs, at least one
    pub fn signature_message_length(&self) -> usize {
        self.message.len().div_ceil(SIGNATURE_FRAGMENT_LENGTH).max(1)
    }

    /// The message cut into padded signature-sized fragments
    pub fn message_fragments(&self) -> Result<Vec<String>> {
        check_trytes(&self.message)?;
        // Trytes are ASCII, every byte offset is a char boundary
        let mut fragments: Vec<String> = self
            .message
            .as_bytes()
            .chunks(SIGNATURE_FRAGMENT_LENGTH)
            .map(|chunk| {
                let chunk: String = chunk.iter().map(|&b| b as char).collect();
                pad_trytes(&chunk, SIGNATURE_FRAGMENT_LENGTH)
            })
            .collect();
        if fragments.is_empty() {
            fragments.push(pad_trytes("", SIGNATURE_FRAGMENT_LENGTH));
        }
        Ok(fragments)
    }

    /// Appends this output, and its message slots, to `bundle`
    pub fn add_to_bundle(&self, bundle: &mut Bundle, timestamp: i64) {
        let trx = Transaction::new(&self.address, self.value, &self.tag, timestamp);
        bundle.add_transaction(trx, self.signature_message_length());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::add_checksum;
    use crate::error::TernaryError;
    use crate::trinary::string_to_trytes;

    const ADDRESS: &str =
        "RGVOWCDJAGSUSEPGFRTRAJYHFHZXJCPGFMEWYHSHVFUIFBKHGSBNGILWTSDKSNXICNJCOPFMAAZHCHJQD";

    fn tag() -> String {
        pad_trytes("TAG", TAG_LENGTH)
    }

    #[test]
    fn test_valid_transfer() {
        let transfer = Transfer::new(ADDRESS, 10, &string_to_trytes("hello"), &tag());
        assert!(transfer.is_valid());

        let checksummed = add_checksum(ADDRESS).unwrap();
        assert!(Transfer::new(&checksummed, 10, "", &tag()).is_valid());
    }

    #[test]
    fn test_invalid_transfers() {
        assert!(!Transfer::new(ADDRESS, 10, "", "TAG").is_valid());
        assert!(!Transfer::new(ADDRESS, 10, "hello", &tag()).is_valid());
        assert!(!Transfer::new("ADDRESS", 10, "", &tag()).is_valid());

        let mut bad_checksum = add_checksum(ADDRESS).unwrap();
        bad_checksum.replace_range(81.., "999999999");
        assert!(!Transfer::new(&bad_checksum, 10, "", &tag()).is_valid());
    }

    #[test]
    fn test_message_slots() {
        let mut transfer = Transfer::new(ADDRESS, 0, "", &tag());
        assert_eq!(transfer.signature_message_length(), 1);
        assert_eq!(transfer.message_fragments().unwrap().len(), 1);

        transfer.set_message(&"A".repeat(SIGNATURE_FRAGMENT_LENGTH));
        assert_eq!(transfer.signature_message_length(), 1);

        transfer.set_message(&"A".repeat(SIGNATURE_FRAGMENT_LENGTH + 1));
        assert_eq!(transfer.signature_message_length(), 2);
        let fragments = transfer.message_fragments().unwrap();
        assert_eq!(fragments.len(), 2);
        assert!(fragments[1].starts_with("A9"));
        assert!(fragments
            .iter()
            .all(|f| f.len() == SIGNATURE_FRAGMENT_LENGTH));
    }

    #[test]
    fn test_message_fragments_reject_non_trytes() {
        let mut message = "A".repeat(SIGNATURE_FRAGMENT_LENGTH - 1);
        message.push('é');
        let transfer = Transfer::new(ADDRESS, 0, &message, &tag());
        assert!(matches!(
            transfer.message_fragments(),
            Err(TernaryError::InvalidTrytes(_))
        ));
        assert!(!transfer.is_valid());
    }

    #[test]
    fn test_add_to_bundle() {
        let transfer = Transfer::new(ADDRESS, 5, &"B".repeat(3000), &tag());
        let mut bundle = Bundle::new();
        transfer.add_to_bundle(&mut bundle, 1_700_000_000);
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.get_transactions()[0].get_value(), 5);
        assert_eq!(bundle.get_transactions()[1].get_value(), 0);
    }
}
