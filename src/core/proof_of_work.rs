use crate::core::constants::{HASH_LENGTH_TRITS, NONCE_LENGTH, TRANSACTION_LENGTH};
use crate::core::transaction::{layout, POW_PREFIX_TRITS};
use crate::crypto::pair_curl::{pair_transform, PairState, TritPair, LANES};
use crate::crypto::{Curl, CurlMode, Sponge};
use crate::error::{Result, TernaryError};
use crate::trinary::{check_trytes, trits_to_trytes, trytes_to_trits};
use log::{debug, info};
use rayon::ThreadPoolBuilder;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// First trit of the nonce inside the final 243-trit block
const NONCE_OFFSET: usize = HASH_LENGTH_TRITS - NONCE_LENGTH * 3;
/// Counter trits start after the four lane-seed trits
const NONCE_INIT_START: usize = NONCE_OFFSET + 4;

// Seeds trits NONCE_OFFSET..NONCE_OFFSET + 4 so every lane starts from a different nonce
const LANE_SEEDS: [TritPair; 4] = [
    TritPair {
        low: 0xDB6DB6DB6DB6DB6D,
        high: 0xB6DB6DB6DB6DB6DB,
    },
    TritPair {
        low: 0xF1F8FC7E3F1F8FC7,
        high: 0x8FC7E3F1F8FC7E3F,
    },
    TritPair {
        low: 0x7FFFE00FFFFC01FF,
        high: 0xFFC01FFFF803FFFF,
    },
    TritPair {
        low: 0xFFC0000007FFFFFF,
        high: 0x003FFFFFFFFFFFFF,
    },
];

const ROUNDS: usize = 81;

/// State shared by the workers of one search
#[derive(Debug, Default)]
struct SearchState {
    found: AtomicBool,
    result: Mutex<Option<String>>,
}

/// Handle that stops a running search from another thread
#[derive(Debug, Clone)]
pub struct PowInterrupt {
    shared: Arc<SearchState>,
}

impl PowInterrupt {
    pub fn interrupt(&self) {
        self.shared.found.store(true, Ordering::SeqCst);
    }
}

/// Multithreaded nonce search over the lane-parallel Curl
#[derive(Debug, Default)]
pub struct ProofOfWork {
    shared: Arc<SearchState>,
}

impl ProofOfWork {
    pub fn new() -> ProofOfWork {
        ProofOfWork::default()
    }

    pub fn interrupter(&self) -> PowInterrupt {
        PowInterrupt {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Stops the current search, workers exit after their current transform. A search
    /// started afterwards clears the flag again.
    pub fn interrupt(&self) {
        self.interrupter().interrupt();
    }

    /// Finds a 27-tryte nonce giving the transaction hash `min_weight_magnitude` trailing
    /// zero trits on `threads` workers, 0 meaning one per core. `None` means the search
    /// was interrupted.
    pub fn search(
        &self,
        trytes: &str,
        min_weight_magnitude: usize,
        threads: usize,
    ) -> Result<Option<String>> {
        if trytes.len() != TRANSACTION_LENGTH {
            return Err(TernaryError::length(
                "transaction",
                TRANSACTION_LENGTH,
                trytes.len(),
            ));
        }
        check_trytes(trytes)?;
        if min_weight_magnitude > HASH_LENGTH_TRITS {
            return Err(TernaryError::InvalidTrits(format!(
                "minimum weight magnitude {min_weight_magnitude} exceeds {HASH_LENGTH_TRITS}"
            )));
        }

        self.shared.found.store(false, Ordering::SeqCst);
        *self
            .shared
            .result
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;

        let initial = prepare_state(trytes)?;

        // A pool per search, zero threads lets rayon pick one per core
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|worker| format!("pow-worker-{worker}"))
            .build()
            .map_err(|e| TernaryError::ProofOfWork(e.to_string()))?;
        info!(
            "Searching nonce with weight {min_weight_magnitude} on {} threads",
            pool.current_num_threads()
        );
        let started = Instant::now();

        pool.broadcast(|ctx| {
            search_worker(&self.shared, &initial, ctx.index(), min_weight_magnitude);
        });

        let nonce = self
            .shared
            .result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match &nonce {
            Some(nonce) => info!("Found nonce {nonce} in {:?}", started.elapsed()),
            None => info!("Proof of work interrupted after {:?}", started.elapsed()),
        }
        Ok(nonce)
    }

    /// Runs a search and writes the nonce into the transaction trytes
    pub fn attach(
        &self,
        trytes: &str,
        min_weight_magnitude: usize,
        threads: usize,
    ) -> Result<Option<String>> {
        Ok(self
            .search(trytes, min_weight_magnitude, threads)?
            .map(|nonce| format!("{}{nonce}", &trytes[..layout::NONCE.start])))
    }
}

/// Curl state after absorbing all but the last block, with the last block loaded and
/// the lane seeds in place
fn prepare_state(trytes: &str) -> Result<PairState> {
    let trits = trytes_to_trits(trytes)?;
    let mut curl = Curl::new(CurlMode::CurlP81);
    curl.absorb(&trits, 0, POW_PREFIX_TRITS)?;

    let mut scalar = *curl.get_state();
    scalar[..HASH_LENGTH_TRITS].copy_from_slice(&trits[POW_PREFIX_TRITS..]);

    let mut state = PairState::from_trits(&scalar)?;
    for (offset, seed) in LANE_SEEDS.iter().enumerate() {
        state.set(NONCE_OFFSET + offset, *seed);
    }
    Ok(state)
}

fn search_worker(shared: &SearchState, initial: &PairState, worker: usize, mwm: usize) {
    let mut state = initial.clone();
    for _ in 0..worker {
        increment(&mut state);
    }

    let mut scratch = state.clone();
    while !shared.found.load(Ordering::SeqCst) {
        if increment(&mut state) {
            debug!("Worker {worker} exhausted its nonce range");
            return;
        }

        scratch.low.copy_from_slice(&state.low);
        scratch.high.copy_from_slice(&state.high);
        pair_transform(&mut scratch, ROUNDS);

        if let Some(lane) = winning_lane(&scratch, mwm) {
            let mut result = shared
                .result
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if !shared.found.swap(true, Ordering::SeqCst) {
                let nonce_trits = state.lane_trits(lane, NONCE_OFFSET..HASH_LENGTH_TRITS);
                // Decoded lanes only ever hold valid trits
                if let Ok(nonce) = trits_to_trytes(&nonce_trits) {
                    debug!("Worker {worker} won on lane {lane}");
                    *result = Some(nonce);
                }
            }
            return;
        }
    }
}

/// Adds one to every lane's nonce counter, true once the counter wraps
fn increment(state: &mut PairState) -> bool {
    for i in NONCE_INIT_START..HASH_LENGTH_TRITS {
        let low = state.low[i];
        let high = state.high[i];
        state.low[i] = high ^ low;
        state.high[i] = low;
        if high & !low == 0 {
            return false;
        }
    }
    true
}

/// Lane whose hash ends in `mwm` zero trits, if any
fn winning_lane(state: &PairState, mwm: usize) -> Option<usize> {
    let mut probe = u64::MAX;
    for i in HASH_LENGTH_TRITS - mwm..HASH_LENGTH_TRITS {
        probe &= !(state.low[i] ^ state.high[i]);
        if probe == 0 {
            return None;
        }
    }
    let lane = probe.trailing_zeros() as usize;
    (lane < LANES).then_some(lane)
}
