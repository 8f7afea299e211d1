// ---------------------------------------------------------------------------
// Entry & slot builder — groups PoH entries into sealed, numbered slots.
//
// An entry with no transactions is a tick; one with transactions is a
// mixin entry. Slots package a run of entries behind a monotonic slot
// number and a parent/last hash pair that chains to the previous slot.
//
// Reference: examples/rohallah12-Solana-Mini/src/runtime/poh.rs (Entry
//            shape, tick/record split), generalized with slot sealing
//            for multi-node replication.
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::hash::Hash;
use crate::poh::PohClock;
use crate::transaction::{batch_hash, Transfer};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entry {
    pub num_hashes: u64,
    pub hash: Hash,
    pub transactions: Vec<Transfer>,
}

impl Entry {
    pub fn is_tick(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Slot {
    pub slot: u64,
    pub parent_hash: Hash,
    pub entries: Vec<Entry>,
    pub last_hash: Hash,
}

/// Configuration knobs for entry/slot packaging. Policy, not invariant —
/// defaults match a conservative `hashes_per_tick`.
#[derive(Clone, Copy, Debug)]
pub struct SlotConfig {
    pub ticks_per_slot: u64,
    pub hashes_per_tick: u64,
}

impl Default for SlotConfig {
    fn default() -> Self {
        SlotConfig {
            ticks_per_slot: 64,
            hashes_per_tick: 64,
        }
    }
}

/// Accumulates entries for the slot currently being built and seals it
/// once `ticks_per_slot` tick boundaries have elapsed.
pub struct EntryBuilder {
    config: SlotConfig,
    next_slot: u64,
    parent_hash: Hash,
    entries: Vec<Entry>,
    ticks_this_slot: u64,
}

impl EntryBuilder {
    pub fn new(config: SlotConfig, genesis_hash: Hash) -> Self {
        EntryBuilder {
            config,
            next_slot: 0,
            parent_hash: genesis_hash,
            entries: Vec::new(),
            ticks_this_slot: 0,
        }
    }

    /// Advance the clock by one tick boundary (`hashes_per_tick` raw
    /// hashes). If nothing is pending to mix in, emits a tick entry and
    /// counts the boundary toward `ticks_per_slot`. Returns the entry
    /// together with the slot it sealed, if this tick closed one out.
    pub fn on_tick(&mut self, clock: &mut PohClock) -> (Entry, Option<Slot>) {
        for _ in 0..self.config.hashes_per_tick {
            clock.tick();
        }
        let (num_hashes, hash) = clock.close_tick_entry();
        let entry = Entry {
            num_hashes,
            hash,
            transactions: Vec::new(),
        };
        self.entries.push(entry.clone());

        self.ticks_this_slot += 1;
        let sealed = if self.ticks_this_slot >= self.config.ticks_per_slot {
            Some(self.seal_slot(hash))
        } else {
            None
        };
        (entry, sealed)
    }

    /// Mix a nonempty batch of transfers into PoH and emit a mixin
    /// entry. The batch must not be empty — callers hold transfers
    /// until there is at least one to admit. Returns the entry and the
    /// slot number it belongs to (never seals a slot by itself; only
    /// tick boundaries do).
    pub fn on_mixin(&mut self, clock: &mut PohClock, transfers: Vec<Transfer>) -> (Entry, u64) {
        debug_assert!(!transfers.is_empty());
        let building_slot = self.next_slot;
        let payload = batch_hash(&transfers);
        let (num_hashes, hash) = clock.mixin(payload);
        let entry = Entry {
            num_hashes,
            hash,
            transactions: transfers,
        };
        self.entries.push(entry.clone());
        (entry, building_slot)
    }

    fn seal_slot(&mut self, last_hash: Hash) -> Slot {
        let slot = Slot {
            slot: self.next_slot,
            parent_hash: self.parent_hash,
            entries: std::mem::take(&mut self.entries),
            last_hash,
        };
        self.next_slot += 1;
        self.parent_hash = last_hash;
        self.ticks_this_slot = 0;
        slot
    }

    pub fn next_slot_number(&self) -> u64 {
        self.next_slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::genesis_hash;

    #[test]
    fn seals_after_configured_ticks() {
        let config = SlotConfig {
            ticks_per_slot: 3,
            hashes_per_tick: 2,
        };
        let mut clock = PohClock::new();
        let mut builder = EntryBuilder::new(config, genesis_hash());

        assert!(builder.on_tick(&mut clock).1.is_none());
        assert!(builder.on_tick(&mut clock).1.is_none());
        let slot = builder.on_tick(&mut clock).1.expect("third tick seals");

        assert_eq!(slot.slot, 0);
        assert_eq!(slot.parent_hash, genesis_hash());
        assert_eq!(slot.entries.len(), 3);
        assert_eq!(slot.last_hash, slot.entries.last().unwrap().hash);
        assert_eq!(builder.next_slot_number(), 1);
    }

    #[test]
    fn second_slot_chains_to_first() {
        let config = SlotConfig {
            ticks_per_slot: 1,
            hashes_per_tick: 1,
        };
        let mut clock = PohClock::new();
        let mut builder = EntryBuilder::new(config, genesis_hash());

        let slot0 = builder.on_tick(&mut clock).1.unwrap();
        let slot1 = builder.on_tick(&mut clock).1.unwrap();

        assert_eq!(slot1.parent_hash, slot0.last_hash);
        assert_eq!(slot1.slot, 1);
    }
}
