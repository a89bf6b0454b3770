use crate::core::constants::TRYTE_ALPHABET;
use crate::error::{Result, TernaryError};
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch
pub fn current_timestamp() -> Result<i64> {
    let duration = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();

    // Ensure the timestamp fits in i64
    if duration > i64::MAX as u128 {
        return Err(TernaryError::Clock("timestamp overflows i64".to_string()));
    }

    Ok(duration as i64)
}

/// `length` trytes drawn uniformly from the thread-local CSPRNG
pub fn random_trytes(length: usize) -> String {
    let alphabet = TRYTE_ALPHABET.as_bytes();
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trinary::is_valid_trytes;

    #[test]
    fn test_current_timestamp_is_millis() {
        let now = current_timestamp().unwrap();
        // Later than 2020-01-01 in milliseconds
        assert!(now > 1_577_836_800_000);
    }

    #[test]
    fn test_clock_errors_are_not_validation() {
        let before_epoch = UNIX_EPOCH
            .duration_since(UNIX_EPOCH + std::time::Duration::from_secs(1))
            .unwrap_err();
        let err = TernaryError::from(before_epoch);
        assert!(matches!(err, TernaryError::Clock(_)));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_random_trytes() {
        let trytes = random_trytes(81);
        assert_eq!(trytes.len(), 81);
        assert!(is_valid_trytes(&trytes));
        assert_ne!(trytes, random_trytes(81));
        assert!(random_trytes(0).is_empty());
    }
}
