//! Shared sponge interface
//!
//! Curl, the lane-parallel pair Curl and Kerl all absorb and squeeze in 243-element
//! blocks. Callers pick the implementation, the calling code stays the same.

use crate::core::constants::HASH_LENGTH_TRITS;
use crate::error::{Result, TernaryError};

pub trait Sponge {
    /// Element type the sponge works on: a trit, or a 64-lane trit pair
    type Cell: Copy + Default;

    /// Back to the initial state, required between independent hashes
    fn reset(&mut self);

    /// Consumes `input[offset..offset + length]`, one transform per 243 elements
    fn absorb(&mut self, input: &[Self::Cell], offset: usize, length: usize) -> Result<()>;

    /// Fills `output[offset..offset + length]`, one transform per 243 elements
    fn squeeze(&mut self, output: &mut [Self::Cell], offset: usize, length: usize)
        -> Result<()>;

    fn absorb_all(&mut self, input: &[Self::Cell]) -> Result<()> {
        self.absorb(input, 0, input.len())
    }

    fn squeeze_into(&mut self, output: &mut [Self::Cell]) -> Result<()> {
        let length = output.len();
        self.squeeze(output, 0, length)
    }

    /// Reset, absorb everything, squeeze one hash
    fn hash(&mut self, input: &[Self::Cell]) -> Result<Vec<Self::Cell>> {
        self.reset();
        self.absorb_all(input)?;
        let mut output = vec![Self::Cell::default(); HASH_LENGTH_TRITS];
        self.squeeze_into(&mut output)?;
        Ok(output)
    }
}

/// Checks an absorb/squeeze window against its buffer
pub(crate) fn check_window(buffer_len: usize, offset: usize, length: usize) -> Result<()> {
    if length == 0 || length % HASH_LENGTH_TRITS != 0 {
        return Err(TernaryError::Crypto(format!(
            "sponge length {length} is not a positive multiple of {HASH_LENGTH_TRITS}"
        )));
    }
    match offset.checked_add(length) {
        Some(end) if end <= buffer_len => Ok(()),
        _ => Err(TernaryError::Crypto(format!(
            "sponge window {offset}+{length} exceeds buffer of {buffer_len}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_window() {
        assert!(check_window(243, 0, 243).is_ok());
        assert!(check_window(729, 243, 486).is_ok());
        assert!(check_window(243, 0, 0).is_err());
        assert!(check_window(486, 0, 244).is_err());
        assert!(check_window(243, 1, 243).is_err());
        assert!(check_window(243, usize::MAX, 243).is_err());
    }
}
