//! Kerl: Keccak-384 behind a ternary sponge interface
//!
//! Every 243-trit block crosses into binary through the 384-bit bridge. Squeezing
//! finalizes the Keccak state, then feeds the complemented digest back in so the next
//! block differs.

use crate::core::constants::HASH_LENGTH_TRITS;
use crate::crypto::sponge::{check_window, Sponge};
use crate::error::Result;
use crate::trinary::{bytes_to_trits, trits_to_bytes, Trit};
use sha3::{Digest, Keccak384};

#[derive(Clone, Default)]
pub struct Kerl {
    keccak: Keccak384,
}

impl Kerl {
    pub fn new() -> Kerl {
        Kerl::default()
    }
}

impl Sponge for Kerl {
    type Cell = Trit;

    fn reset(&mut self) {
        self.keccak = Keccak384::new();
    }

    fn absorb(&mut self, input: &[Trit], offset: usize, length: usize) -> Result<()> {
        check_window(input.len(), offset, length)?;
        let mut block = [0 as Trit; HASH_LENGTH_TRITS];
        for chunk in input[offset..offset + length].chunks_exact(HASH_LENGTH_TRITS) {
            block.copy_from_slice(chunk);
            // The bridge cannot carry the top trit
            block[HASH_LENGTH_TRITS - 1] = 0;
            let bytes = trits_to_bytes(&block)?;
            self.keccak.update(bytes);
        }
        Ok(())
    }

    fn squeeze(&mut self, output: &mut [Trit], offset: usize, length: usize) -> Result<()> {
        check_window(output.len(), offset, length)?;
        for chunk in output[offset..offset + length].chunks_exact_mut(HASH_LENGTH_TRITS) {
            let digest = self.keccak.finalize_reset();
            chunk.copy_from_slice(&bytes_to_trits(&digest)?);

            let flipped: Vec<u8> = digest.iter().map(|byte| !byte).collect();
            self.keccak.update(&flipped);
        }
        Ok(())
    }
}
