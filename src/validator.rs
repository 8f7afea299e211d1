// ---------------------------------------------------------------------------
// Validator replay — ingests leader-sealed slots, re-derives PoH,
// re-verifies every signature, and re-applies transfers to its own
// bank. Convergence: a validator that ingests every slot the leader
// sealed ends up with a bitwise-identical bank over all common keys.
//
// Reference: examples/rohallah12-Solana-Mini/src/runtime/poh.rs::verify
//            (the recomputation loop), generalized to walk a batch of
//            Slots and re-run the full admission pipeline per
//            transaction instead of just checking hashes.
// ---------------------------------------------------------------------------

use log::{info, warn};
use thiserror::Error;

use crate::bank::{mint_keypair, Bank, RecentHashWindow, SeenSignatures, DEFAULT_RECENT_HASH_WINDOW};
use crate::hash::{genesis_hash, Hash};
use crate::keys::PublicKey;
use crate::ledger::Slot;
use crate::poh::rederive;
use crate::transaction::{batch_hash, check_amount, verify_signature, TransactionError};

#[derive(Debug, Error, Eq, PartialEq)]
pub enum IngestError {
    #[error("slot {slot}: expected slot {expected}, got a gap or reorder")]
    SlotGap { slot: u64, expected: u64 },
    #[error("slot {slot}: parent_hash does not chain to the local last hash")]
    ParentHashMismatch { slot: u64 },
    #[error("slot {slot} entry {entry}: recomputed PoH hash does not match")]
    PohMismatch { slot: u64, entry: usize },
    #[error("slot {slot} entry {entry}: last entry hash does not match slot.last_hash")]
    LastHashMismatch { slot: u64, entry: usize },
    #[error("slot {slot} entry {entry} tx {tx}: {source}")]
    TransactionRejected {
        slot: u64,
        entry: usize,
        tx: usize,
        #[source]
        source: TransactionError,
    },
}

pub struct Validator {
    bank: Bank,
    window: RecentHashWindow,
    seen: SeenSignatures,
    ledger: Vec<Slot>,
    expected_next_slot: u64,
    local_last_hash: Hash,
    mint: PublicKey,
}

impl Validator {
    pub fn new() -> Self {
        Self::with_window_capacity(DEFAULT_RECENT_HASH_WINDOW)
    }

    pub fn with_window_capacity(window_capacity: usize) -> Self {
        let genesis = genesis_hash();
        let mut window = RecentHashWindow::new(window_capacity);
        window.insert(genesis, 0);
        let (mint, _) = mint_keypair();

        let mut bank = Bank::new();
        // Validators never accept airdrops directly; they only see the
        // mint's balance move through replayed transfers. The mint
        // still needs its genesis balance seeded identically to the
        // leader for those transfers to validate.
        bank.credit(mint, u64::MAX)
            .expect("genesis credit cannot overflow an empty bank");

        Validator {
            bank,
            window,
            seen: SeenSignatures::new(),
            ledger: Vec::new(),
            expected_next_slot: 0,
            local_last_hash: genesis,
            mint,
        }
    }

    pub fn balance(&self, pubkey: &PublicKey) -> u64 {
        self.bank.get(pubkey)
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn ledger(&self) -> &[Slot] {
        &self.ledger
    }

    pub fn mint_pubkey(&self) -> PublicKey {
        self.mint
    }

    /// Ingest an ordered batch of slots. Accepts a strict prefix of the
    /// batch: on the first mismatch, that slot and everything after it
    /// in the batch is rejected, and the count of slots committed
    /// before the mismatch is returned alongside the error.
    pub fn ingest(&mut self, slots: Vec<Slot>) -> (u64, Option<IngestError>) {
        let mut accepted = 0u64;
        for slot in slots {
            match self.ingest_one(&slot) {
                Ok(()) => {
                    accepted += 1;
                }
                Err(e) => {
                    warn!("ingest rejected slot {}: {e}", slot.slot);
                    return (accepted, Some(e));
                }
            }
        }
        (accepted, None)
    }

    /// Re-derives PoH and re-validates every transaction in `slot`
    /// against scratch copies of bank/window/seen, only swapping them
    /// into `self` if the entire slot checks out — partial application
    /// is forbidden even when a failure occurs on, say, the last
    /// transaction of the last entry.
    fn ingest_one(&mut self, slot: &Slot) -> Result<(), IngestError> {
        if slot.slot != self.expected_next_slot {
            return Err(IngestError::SlotGap {
                slot: slot.slot,
                expected: self.expected_next_slot,
            });
        }
        if slot.parent_hash != self.local_last_hash {
            return Err(IngestError::ParentHashMismatch { slot: slot.slot });
        }

        let mut bank = self.bank.clone();
        let mut window = self.window.clone();
        let mut seen = self.seen.clone();

        let mut h = slot.parent_hash;
        for (entry_idx, entry) in slot.entries.iter().enumerate() {
            let payload = if entry.transactions.is_empty() {
                None
            } else {
                Some(batch_hash(&entry.transactions))
            };
            let h_prime = rederive(h, entry.num_hashes, payload);
            if h_prime != entry.hash {
                return Err(IngestError::PohMismatch {
                    slot: slot.slot,
                    entry: entry_idx,
                });
            }

            for (tx_idx, t) in entry.transactions.iter().enumerate() {
                Self::validate_and_apply(&mut bank, &window, &mut seen, t).map_err(|source| {
                    IngestError::TransactionRejected {
                        slot: slot.slot,
                        entry: entry_idx,
                        tx: tx_idx,
                        source,
                    }
                })?;
            }

            // Feed this entry's hash into the window immediately, the
            // way the leader does, so a later entry in the same slot
            // can reference it as a recent_hash.
            if let Some((_, evicted_slot)) = window.insert(entry.hash, slot.slot) {
                seen.evict_slot(evicted_slot);
            }

            h = h_prime;
        }

        let last_entry_idx = slot.entries.len().saturating_sub(1);
        if h != slot.last_hash {
            return Err(IngestError::LastHashMismatch {
                slot: slot.slot,
                entry: last_entry_idx,
            });
        }

        self.bank = bank;
        self.window = window;
        self.seen = seen;
        self.expected_next_slot += 1;
        self.local_last_hash = slot.last_hash;
        self.ledger.push(slot.clone());
        info!("ingested slot {} ({} entries)", slot.slot, slot.entries.len());
        Ok(())
    }

    /// Re-run every admission check against the scratch state and, on
    /// success, apply the transfer and record its signature — mirroring
    /// the leader's single exclusive-section commit inside the
    /// validator's per-slot scratch transaction.
    fn validate_and_apply(
        bank: &mut Bank,
        window: &RecentHashWindow,
        seen: &mut SeenSignatures,
        t: &crate::transaction::Transfer,
    ) -> Result<(), TransactionError> {
        check_amount(t)?;
        if !window.contains(&t.recent_hash) {
            return Err(TransactionError::UnknownRecentHash);
        }
        if seen.contains(&t.sig) {
            return Err(TransactionError::DuplicateSignature);
        }
        verify_signature(t)?;
        bank.apply_transfer(t)?;

        let slot_of_recent_hash = window.slot_of(&t.recent_hash).unwrap_or(0);
        seen.insert(t.sig, slot_of_recent_hash);
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::keypair_from_seed_byte;
    use crate::leader::Leader;
    use crate::ledger::SlotConfig;

    fn seal_n_slots(leader: &mut Leader, n: usize) -> Vec<Slot> {
        let mut slots = Vec::new();
        let mut ticks = 0;
        while slots.len() < n {
            if let Some(slot) = leader.tick() {
                slots.push(slot.clone());
            }
            ticks += 1;
            assert!(ticks < 10_000, "runaway loop sealing slots");
        }
        slots
    }

    #[test]
    fn replay_converges_with_leader() {
        let mut leader = Leader::new(SlotConfig {
            ticks_per_slot: 2,
            hashes_per_tick: 1,
        });
        let (a, _) = keypair_from_seed_byte(1);
        let (b, _) = keypair_from_seed_byte(2);
        leader.airdrop(a, 1000).unwrap();

        let recent_hash = leader.poh_snapshot();
        let t = crate::transaction::Transfer::new(
            a,
            b,
            10,
            recent_hash,
            {
                use ed25519_dalek::Signer;
                let (_, sk) = keypair_from_seed_byte(1);
                let msg = crate::transaction::canonical_message(a, b, 10, recent_hash);
                crate::keys::Signature(sk.sign(msg.as_bytes()).to_bytes())
            },
        );
        leader.admit_transfer(t).unwrap();

        let slots = seal_n_slots(&mut leader, 3);

        let mut validator = Validator::new();
        let (accepted, err) = validator.ingest(slots.clone());
        assert!(err.is_none());
        assert_eq!(accepted as usize, slots.len());

        assert_eq!(validator.balance(&a), leader.balance(&a));
        assert_eq!(validator.balance(&b), leader.balance(&b));
        assert_eq!(validator.ledger().len(), leader.ledger().len());
    }

    #[test]
    fn gap_rejects_remainder_of_batch() {
        let mut leader = Leader::new(SlotConfig {
            ticks_per_slot: 1,
            hashes_per_tick: 1,
        });
        let slots = seal_n_slots(&mut leader, 4);

        // Slot 2 is missing: the batch jumps straight from slot 1 to slot 3.
        let batch = vec![slots[0].clone(), slots[1].clone(), slots[3].clone()];

        let mut validator = Validator::new();
        let (accepted, err) = validator.ingest(batch);
        assert_eq!(accepted, 2);
        assert!(matches!(err, Some(IngestError::SlotGap { slot: 3, expected: 2 })));
    }
}
