// ---------------------------------------------------------------------------
// Proof of History — the sequential hash chain clock.
//
// PoH is a SHA-256 hash chain. Because SHA-256 cannot be parallelised,
// reproducing the chain costs the same wall-clock time it took to
// generate, which is what lets a validator verify that real time passed
// between two points in the chain.
//
// Two mutating operations:
//   tick()  — advance the chain by one hash, no payload.
//   mixin() — fold an external payload hash into the chain, closing out
//             whatever ticks accumulated since the last entry.
//
// Reference: crate's own lineage, examples/rohallah12-Solana-Mini/src/runtime/poh.rs
//            https://github.com/anza-xyz/solana-sdk/blob/master/entry/src/entry.rs
// ---------------------------------------------------------------------------

use crate::hash::{genesis_hash, sha256, Hash};

/// The running PoH clock. Owned exclusively by whichever role is
/// advancing it: the leader's ticker/admission path, or a validator
/// replaying a slot batch into its own clock.
pub struct PohClock {
    current_hash: Hash,
    hashes_since_last_entry: u64,
}

impl PohClock {
    /// A fresh clock at the genesis hash.
    pub fn new() -> Self {
        PohClock {
            current_hash: genesis_hash(),
            hashes_since_last_entry: 0,
        }
    }

    /// Advance the chain by one hash with no payload.
    pub fn tick(&mut self) {
        self.current_hash = sha256(&self.current_hash.0);
        self.hashes_since_last_entry += 1;
    }

    /// Mix `payload_hash` into the chain, closing the current entry.
    ///
    /// Returns `(num_hashes, new_hash)`: the number of hash iterations
    /// accumulated since the previous entry (including this mixing step)
    /// and the resulting chain value. Resets the since-last-entry counter.
    pub fn mixin(&mut self, payload_hash: Hash) -> (u64, Hash) {
        let mut input = Vec::with_capacity(64);
        input.extend_from_slice(&self.current_hash.0);
        input.extend_from_slice(&payload_hash.0);
        self.current_hash = sha256(&input);
        self.hashes_since_last_entry += 1;

        let num_hashes = self.hashes_since_last_entry;
        self.hashes_since_last_entry = 0;
        (num_hashes, self.current_hash)
    }

    /// Close out a tick entry: returns the hashes accumulated since the
    /// last entry and resets the counter. Called once `hashes_per_tick`
    /// ticks have elapsed with nothing to mix in.
    pub fn close_tick_entry(&mut self) -> (u64, Hash) {
        let num_hashes = self.hashes_since_last_entry;
        self.hashes_since_last_entry = 0;
        (num_hashes, self.current_hash)
    }

    /// The current chain value, without mutation.
    pub fn snapshot(&self) -> Hash {
        self.current_hash
    }

    pub fn hashes_since_last_entry(&self) -> u64 {
        self.hashes_since_last_entry
    }
}

impl Default for PohClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-derive `entry.hash` from `prev_hash` using `num_hashes` iterations,
/// mixing in `payload_hash` on the final step when present: for a mixin
/// entry, the chain is hashed `num_hashes - 1` plain times and then the
/// final step combines the result with the payload hash; for a tick
/// entry (no payload), all `num_hashes` steps are plain.
pub fn rederive(prev_hash: Hash, num_hashes: u64, payload_hash: Option<Hash>) -> Hash {
    let mut h = prev_hash;
    match payload_hash {
        None => {
            for _ in 0..num_hashes {
                h = sha256(&h.0);
            }
            h
        }
        Some(payload) => {
            for _ in 0..num_hashes.saturating_sub(1) {
                h = sha256(&h.0);
            }
            let mut input = Vec::with_capacity(64);
            input.extend_from_slice(&h.0);
            input.extend_from_slice(&payload.0);
            sha256(&input)
        }
    }
}
