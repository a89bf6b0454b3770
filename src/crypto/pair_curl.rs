//! Lane-parallel Curl
//!
//! Each state cell holds 64 independent trits as a (low, high) pair of bit masks:
//!
//! | trit | low | high |
//! |------|-----|------|
//! | -1   | 1   | 0    |
//! | 0    | 1   | 1    |
//! | +1   | 0   | 1    |
//!
//! One call to [`pair_transform`] advances 64 Curl states at once, which is what makes
//! the proof-of-work search fast without SIMD intrinsics.

use crate::core::constants::HASH_LENGTH_TRITS;
use crate::crypto::curl::{CurlMode, STATE_LENGTH, TRANSFORM_INDICES};
use crate::crypto::sponge::{check_window, Sponge};
use crate::error::{Result, TernaryError};
use crate::trinary::{is_valid_trit, Trit};

pub const LANES: usize = 64;

/// 64 trits, one per lane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TritPair {
    pub low: u64,
    pub high: u64,
}

impl Default for TritPair {
    fn default() -> Self {
        TritPair::ZERO
    }
}

impl TritPair {
    pub const ZERO: TritPair = TritPair {
        low: u64::MAX,
        high: u64::MAX,
    };

    /// Same trit in every lane
    pub fn splat(trit: Trit) -> TritPair {
        match trit {
            1 => TritPair {
                low: 0,
                high: u64::MAX,
            },
            -1 => TritPair {
                low: u64::MAX,
                high: 0,
            },
            _ => TritPair::ZERO,
        }
    }

    /// Decodes one lane, an all-zero bit pair reads as 0
    pub fn get_lane(&self, lane: usize) -> Trit {
        let low = (self.low >> lane) & 1;
        let high = (self.high >> lane) & 1;
        match (low, high) {
            (1, 0) => -1,
            (0, 1) => 1,
            _ => 0,
        }
    }

    pub fn set_lane(&mut self, lane: usize, trit: Trit) {
        let bit = 1u64 << lane;
        let (low, high) = match trit {
            1 => (false, true),
            -1 => (true, false),
            _ => (true, true),
        };
        self.low = if low { self.low | bit } else { self.low & !bit };
        self.high = if high { self.high | bit } else { self.high & !bit };
    }
}

/// Curl state in pair encoding, kept as two parallel word arrays
#[derive(Clone)]
pub struct PairState {
    pub low: [u64; STATE_LENGTH],
    pub high: [u64; STATE_LENGTH],
}

impl Default for PairState {
    fn default() -> Self {
        PairState {
            low: [u64::MAX; STATE_LENGTH],
            high: [u64::MAX; STATE_LENGTH],
        }
    }
}

impl PairState {
    /// Broadcasts a scalar Curl state into every lane
    pub fn from_trits(trits: &[Trit]) -> Result<PairState> {
        if trits.len() != STATE_LENGTH {
            return Err(TernaryError::length("curl state", STATE_LENGTH, trits.len()));
        }
        let mut state = PairState::default();
        for (i, &trit) in trits.iter().enumerate() {
            if !is_valid_trit(trit) {
                return Err(TernaryError::InvalidTrits(format!(
                    "state cell {i} holds {trit}"
                )));
            }
            state.set(i, TritPair::splat(trit));
        }
        Ok(state)
    }

    pub fn get(&self, index: usize) -> TritPair {
        TritPair {
            low: self.low[index],
            high: self.high[index],
        }
    }

    pub fn set(&mut self, index: usize, pair: TritPair) {
        self.low[index] = pair.low;
        self.high[index] = pair.high;
    }

    /// Trits of one lane over `range`
    pub fn lane_trits(&self, lane: usize, range: std::ops::Range<usize>) -> Vec<Trit> {
        range.map(|i| self.get(i).get_lane(lane)).collect()
    }
}

/// Runs `rounds` Curl rounds over all 64 lanes in lockstep
pub fn pair_transform(state: &mut PairState, rounds: usize) {
    let mut scratch_low = [0u64; STATE_LENGTH];
    let mut scratch_high = [0u64; STATE_LENGTH];

    for _ in 0..rounds {
        scratch_low.copy_from_slice(&state.low);
        scratch_high.copy_from_slice(&state.high);

        for i in 0..STATE_LENGTH {
            let p = TRANSFORM_INDICES[i];
            let q = TRANSFORM_INDICES[i + 1];
            let alpha = scratch_low[p];
            let beta = scratch_high[p];
            let gamma = scratch_high[q];
            let delta = (alpha | !gamma) & (scratch_low[q] ^ beta);

            state.low[i] = !delta;
            state.high[i] = (alpha ^ gamma) | delta;
        }
    }
}

/// Curl sponge over [`TritPair`] cells
#[derive(Clone, Default)]
pub struct PairCurl {
    state: PairState,
    mode: CurlMode,
}

impl PairCurl {
    pub fn new(mode: CurlMode) -> PairCurl {
        PairCurl {
            state: PairState::default(),
            mode,
        }
    }

    pub fn get_state(&self) -> &PairState {
        &self.state
    }
}

impl Sponge for PairCurl {
    type Cell = TritPair;

    fn reset(&mut self) {
        self.state = PairState::default();
    }

    fn absorb(&mut self, input: &[TritPair], offset: usize, length: usize) -> Result<()> {
        check_window(input.len(), offset, length)?;
        for chunk in input[offset..offset + length].chunks_exact(HASH_LENGTH_TRITS) {
            for (i, pair) in chunk.iter().enumerate() {
                self.state.set(i, *pair);
            }
            pair_transform(&mut self.state, self.mode.rounds());
        }
        Ok(())
    }

    fn squeeze(&mut self, output: &mut [TritPair], offset: usize, length: usize) -> Result<()> {
        check_window(output.len(), offset, length)?;
        for chunk in output[offset..offset + length].chunks_exact_mut(HASH_LENGTH_TRITS) {
            for (i, pair) in chunk.iter_mut().enumerate() {
                *pair = self.state.get(i);
            }
            pair_transform(&mut self.state, self.mode.rounds());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::curl::Curl;

    fn sample_trits(length: usize, salt: usize) -> Vec<Trit> {
        (0..length)
            .map(|i| ((i * 13 + salt * 29 + i / 11) % 3) as Trit - 1)
            .collect()
    }

    #[test]
    fn test_lane_encoding() {
        let mut pair = TritPair::ZERO;
        assert_eq!(pair.get_lane(5), 0);
        pair.set_lane(5, 1);
        pair.set_lane(6, -1);
        assert_eq!(pair.get_lane(5), 1);
        assert_eq!(pair.get_lane(6), -1);
        assert_eq!(pair.get_lane(7), 0);
        pair.set_lane(5, 0);
        assert_eq!(pair.get_lane(5), 0);
        assert_eq!(TritPair::splat(1).get_lane(63), 1);
        assert_eq!(TritPair::splat(-1).get_lane(0), -1);
    }

    #[test]
    fn test_pair_transform_matches_scalar() {
        for mode in [CurlMode::CurlP27, CurlMode::CurlP81] {
            let input = sample_trits(486, 1);

            let mut curl = Curl::new(mode);
            let expected = curl.hash(&input).unwrap();

            let pairs: Vec<TritPair> = input.iter().map(|&t| TritPair::splat(t)).collect();
            let mut pair_curl = PairCurl::new(mode);
            let output = pair_curl.hash(&pairs).unwrap();

            for lane in [0, 17, 63] {
                let trits: Vec<Trit> = output.iter().map(|p| p.get_lane(lane)).collect();
                assert_eq!(trits, expected, "lane {lane} in {mode:?}");
            }
        }
    }

    #[test]
    fn test_lanes_are_independent() {
        let inputs: Vec<Vec<Trit>> = (0..3).map(|salt| sample_trits(243, salt)).collect();

        let mut pairs = vec![TritPair::ZERO; 243];
        for (i, pair) in pairs.iter_mut().enumerate() {
            for (lane, input) in inputs.iter().enumerate() {
                pair.set_lane(lane, input[i]);
            }
        }

        let output = PairCurl::default().hash(&pairs).unwrap();
        for (lane, input) in inputs.iter().enumerate() {
            let expected = Curl::default().hash(input).unwrap();
            let trits: Vec<Trit> = output.iter().map(|p| p.get_lane(lane)).collect();
            assert_eq!(trits, expected);
        }
    }

    #[test]
    fn test_state_broadcast() {
        let trits = sample_trits(STATE_LENGTH, 9);
        let state = PairState::from_trits(&trits).unwrap();
        assert_eq!(state.lane_trits(42, 0..STATE_LENGTH), trits);
        assert!(PairState::from_trits(&trits[..10]).is_err());
    }

    #[test]
    fn test_pair_curl_rejects_bad_length() {
        let mut curl = PairCurl::default();
        assert!(curl.absorb(&[TritPair::ZERO; 100], 0, 100).is_err());
    }
}
