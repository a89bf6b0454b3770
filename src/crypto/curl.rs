use crate::core::constants::HASH_LENGTH_TRITS;
use crate::crypto::sponge::{check_window, Sponge};
use crate::error::{Result, TernaryError};
use crate::trinary::{is_valid_trits, Trit};

/// Sponge state width, three hash widths
pub const STATE_LENGTH: usize = 3 * HASH_LENGTH_TRITS;

// Output trit for s[p] + 4 * s[q] + 5
const TRUTH_TABLE: [Trit; 11] = [1, 0, -1, 2, 1, -1, 0, 2, -1, 1, 0];

const fn build_transform_indices() -> [usize; STATE_LENGTH + 1] {
    let mut indices = [0usize; STATE_LENGTH + 1];
    let mut i = 0;
    while i < STATE_LENGTH {
        indices[i + 1] = if indices[i] < 365 {
            indices[i] + 364
        } else {
            indices[i] - 365
        };
        i += 1;
    }
    indices
}

/// Position `i` of a round reads `TRANSFORM_INDICES[i]` and `TRANSFORM_INDICES[i + 1]`
pub const TRANSFORM_INDICES: [usize; STATE_LENGTH + 1] = build_transform_indices();

/// Round count, 81 is what transaction hashing and proof of work use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurlMode {
    CurlP27,
    #[default]
    CurlP81,
}

impl CurlMode {
    pub fn rounds(self) -> usize {
        match self {
            CurlMode::CurlP27 => 27,
            CurlMode::CurlP81 => 81,
        }
    }

    pub fn from_rounds(rounds: usize) -> Option<CurlMode> {
        match rounds {
            27 => Some(CurlMode::CurlP27),
            81 => Some(CurlMode::CurlP81),
            _ => None,
        }
    }
}

/// Scalar Curl, one trit per state cell
#[derive(Clone)]
pub struct Curl {
    state: [Trit; STATE_LENGTH],
    mode: CurlMode,
}

impl Default for Curl {
    fn default() -> Self {
        Curl::new(CurlMode::default())
    }
}

impl Curl {
    pub fn new(mode: CurlMode) -> Curl {
        Curl {
            state: [0; STATE_LENGTH],
            mode,
        }
    }

    pub fn get_mode(&self) -> CurlMode {
        self.mode
    }

    pub fn get_state(&self) -> &[Trit; STATE_LENGTH] {
        &self.state
    }

    fn transform(&mut self) {
        let mut scratch = [0 as Trit; STATE_LENGTH];
        for _ in 0..self.mode.rounds() {
            scratch.copy_from_slice(&self.state);
            for (i, cell) in self.state.iter_mut().enumerate() {
                let a = scratch[TRANSFORM_INDICES[i]];
                let b = scratch[TRANSFORM_INDICES[i + 1]];
                *cell = TRUTH_TABLE[(a + (b << 2) + 5) as usize];
            }
        }
    }
}

impl Sponge for Curl {
    type Cell = Trit;

    fn reset(&mut self) {
        self.state = [0; STATE_LENGTH];
    }

    fn absorb(&mut self, input: &[Trit], offset: usize, length: usize) -> Result<()> {
        check_window(input.len(), offset, length)?;
        let window = &input[offset..offset + length];
        if !is_valid_trits(window) {
            return Err(TernaryError::InvalidTrits(
                "curl input contains a value outside {-1, 0, 1}".to_string(),
            ));
        }
        for chunk in window.chunks_exact(HASH_LENGTH_TRITS) {
            self.state[..HASH_LENGTH_TRITS].copy_from_slice(chunk);
            self.transform();
        }
        Ok(())
    }

    fn squeeze(&mut self, output: &mut [Trit], offset: usize, length: usize) -> Result<()> {
        check_window(output.len(), offset, length)?;
        for chunk in output[offset..offset + length].chunks_exact_mut(HASH_LENGTH_TRITS) {
            chunk.copy_from_slice(&self.state[..HASH_LENGTH_TRITS]);
            self.transform();
        }
        Ok(())
    }
}
