// ---------------------------------------------------------------------------
// Leader — the single coordinator that owns PoH, the bank, the entry
// builder, the recent-hash window, and seen-signatures: single-writer
// consistency over every primitive a transfer touches.
//
// Transaction admission and PoH ticking never interleave mid-entry: a
// transfer either mixes into PoH producing a mixin entry, or waits for
// the current tick to close. Here that is modeled as plain sequential
// `&mut self` calls — the transport layer is responsible for
// serializing concurrent callers behind a mutex.
//
// Reference: examples/rohallah12-Solana-Mini/src/runtime/rpc.rs
//            (NodeState, genesis seeding, the tick/record/commit
//            sequence), generalized from one HTTP handler into a
//            reusable coordinator with no I/O inside it.
// ---------------------------------------------------------------------------

use log::{debug, info, warn};

use crate::bank::{mint_keypair, Bank, RecentHashWindow, SeenSignatures, DEFAULT_RECENT_HASH_WINDOW};
use crate::hash::{genesis_hash, Hash};
use crate::keys::PublicKey;
use crate::ledger::{EntryBuilder, Slot, SlotConfig};
use crate::poh::PohClock;
use crate::transaction::{check_amount, verify_signature, Transfer, TransactionError};

pub struct Leader {
    clock: PohClock,
    bank: Bank,
    builder: EntryBuilder,
    window: RecentHashWindow,
    seen: SeenSignatures,
    ledger: Vec<Slot>,
    mint: PublicKey,
    mint_signing_key: ed25519_dalek::SigningKey,
}

impl Leader {
    pub fn new(config: SlotConfig) -> Self {
        Self::with_window_capacity(config, DEFAULT_RECENT_HASH_WINDOW)
    }

    pub fn with_window_capacity(config: SlotConfig, window_capacity: usize) -> Self {
        let genesis = genesis_hash();
        let mut window = RecentHashWindow::new(window_capacity);
        // Seed the window so transfers can anchor to genesis before the
        // first tick has elapsed.
        window.insert(genesis, 0);

        let (mint, mint_signing_key) = mint_keypair();
        let mut bank = Bank::new();
        // The mint is pre-funded so airdrops, recorded as ordinary
        // transfers from this key, never themselves run into
        // InsufficientFunds.
        bank.credit(mint, u64::MAX).expect("genesis credit cannot overflow an empty bank");

        info!("leader genesis: mint={mint:?} genesis_hash={genesis:?}");

        Leader {
            clock: PohClock::new(),
            bank,
            builder: EntryBuilder::new(config, genesis),
            window,
            seen: SeenSignatures::new(),
            ledger: Vec::new(),
            mint,
            mint_signing_key,
        }
    }

    pub fn mint_pubkey(&self) -> PublicKey {
        self.mint
    }

    pub fn mint_signing_key(&self) -> &ed25519_dalek::SigningKey {
        &self.mint_signing_key
    }

    /// The current PoH snapshot; clients use it as `recent_hash` for new
    /// transfers.
    pub fn poh_snapshot(&self) -> Hash {
        self.clock.snapshot()
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

    /// Advance PoH by one tick boundary. If no transfers are pending
    /// this simply closes a tick entry (see `admit_transfer`'s mixin
    /// path for the alternative). Returns the newly sealed slot, if
    /// this tick closed one out.
    pub fn tick(&mut self) -> Option<&Slot> {
        let (entry, sealed) = self.builder.on_tick(&mut self.clock);
        self.feed_window(&entry, sealed.as_ref().map_or(self.builder.next_slot_number(), |s| s.slot));
        sealed.map(|slot| self.commit_slot(slot))
    }

    /// Admit a single transfer: runs all five ordered admission checks,
    /// and on success mixes it into PoH immediately as its own mixin
    /// entry. A practical leader would batch several transfers between
    /// ticks; admitting one at a time is equivalent for correctness and
    /// is what this coordinator does.
    pub fn admit_transfer(&mut self, t: Transfer) -> Result<Hash, TransactionError> {
        check_amount(&t)?;

        if !self.window.contains(&t.recent_hash) {
            warn!("rejected transfer: unknown recent_hash {:?}", t.recent_hash);
            return Err(TransactionError::UnknownRecentHash);
        }

        if self.seen.contains(&t.sig) {
            warn!("rejected transfer: duplicate signature {:?}", t.sig);
            return Err(TransactionError::DuplicateSignature);
        }

        verify_signature(&t)?;

        self.bank.apply_transfer(&t)?;

        // Commit point: signature is now spent and the transfer is
        // bound to a PoH position.
        let slot_of_recent_hash = self.window.slot_of(&t.recent_hash).unwrap_or(0);
        self.seen.insert(t.sig, slot_of_recent_hash);

        let (entry, building_slot) = self.builder.on_mixin(&mut self.clock, vec![t]);
        self.feed_window(&entry, building_slot);
        debug!("admitted transfer, entry hash={:?}", entry.hash);
        Ok(entry.hash)
    }

    /// Airdrop: an operator facility with no signature check on the
    /// caller's side. Recorded as a signed transfer from the well-known
    /// mint key so it enters the slot stream like any other transfer
    /// and validators converge on it during replay.
    pub fn airdrop(&mut self, to: PublicKey, amount: u64) -> Result<Hash, TransactionError> {
        use crate::transaction::canonical_message;
        use ed25519_dalek::Signer;

        let recent_hash = self.poh_snapshot();
        let msg = canonical_message(self.mint, to, amount, recent_hash);
        let sig = self.mint_signing_key.sign(msg.as_bytes());
        let transfer = Transfer::new(
            self.mint,
            to,
            amount,
            recent_hash,
            crate::keys::Signature(sig.to_bytes()),
        );
        info!("airdrop {amount} to {to:?}");
        self.admit_transfer(transfer)
    }

    /// Feed a freshly-produced entry's hash into the recent-hash window
    /// as soon as it is produced, not only once its slot seals, so
    /// transfers still admitting within the same slot can anchor to it.
    fn feed_window(&mut self, entry: &crate::ledger::Entry, slot: u64) {
        if let Some((evicted, evicted_slot)) = self.window.insert(entry.hash, slot) {
            self.seen.evict_slot(evicted_slot);
            debug!("recent-hash window evicted slot {evicted_slot} hash={evicted:?}");
        }
    }

    fn commit_slot(&mut self, slot: Slot) -> &Slot {
        info!("sealed slot {} with {} entries", slot.slot, slot.entries.len());
        self.ledger.push(slot);
        self.ledger.last().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::keypair_from_seed_byte;
    use crate::transaction::canonical_message;
    use ed25519_dalek::Signer;

    fn default_leader() -> Leader {
        Leader::new(SlotConfig {
            ticks_per_slot: 4,
            hashes_per_tick: 2,
        })
    }

    fn signed_transfer(
        seed: u8,
        to: PublicKey,
        amount: u64,
        recent_hash: Hash,
    ) -> Transfer {
        let (from, signing_key) = keypair_from_seed_byte(seed);
        let msg = canonical_message(from, to, amount, recent_hash);
        let sig = signing_key.sign(msg.as_bytes());
        Transfer::new(from, to, amount, recent_hash, crate::keys::Signature(sig.to_bytes()))
    }

    #[test]
    fn airdrop_then_transfer() {
        let mut leader = default_leader();
        let (a, _) = keypair_from_seed_byte(1);
        let (b, _) = keypair_from_seed_byte(2);

        leader.airdrop(a, 1000).unwrap();
        let recent_hash = leader.poh_snapshot();
        let t = signed_transfer(1, b, 10, recent_hash);
        leader.admit_transfer(t).unwrap();

        assert_eq!(leader.balance(&a), 990);
        assert_eq!(leader.balance(&b), 10);
    }

    #[test]
    fn duplicate_signature_rejected() {
        let mut leader = default_leader();
        let (a, _) = keypair_from_seed_byte(1);
        let (b, _) = keypair_from_seed_byte(2);
        leader.airdrop(a, 1000).unwrap();

        let recent_hash = leader.poh_snapshot();
        let t = signed_transfer(1, b, 10, recent_hash);
        leader.admit_transfer(t.clone()).unwrap();

        assert_eq!(
            leader.admit_transfer(t),
            Err(TransactionError::DuplicateSignature)
        );
        assert_eq!(leader.balance(&a), 990);
    }

    #[test]
    fn unknown_recent_hash_rejected() {
        let mut leader = default_leader();
        let (a, _) = keypair_from_seed_byte(1);
        let (b, _) = keypair_from_seed_byte(2);
        leader.airdrop(a, 1000).unwrap();

        let bogus = Hash::new([0u8; 32]);
        let t = signed_transfer(1, b, 10, bogus);
        assert_eq!(
            leader.admit_transfer(t),
            Err(TransactionError::UnknownRecentHash)
        );
    }

    #[test]
    fn insufficient_funds_rejected() {
        let mut leader = default_leader();
        let (a, _) = keypair_from_seed_byte(1);
        let (b, _) = keypair_from_seed_byte(2);
        leader.airdrop(a, 1000).unwrap();

        let recent_hash = leader.poh_snapshot();
        let t = signed_transfer(1, b, 1001, recent_hash);
        assert_eq!(
            leader.admit_transfer(t),
            Err(TransactionError::InsufficientFunds)
        );
    }

    #[test]
    fn ticking_seals_slots() {
        let mut leader = default_leader();
        assert!(leader.tick().is_none());
        assert!(leader.tick().is_none());
        assert!(leader.tick().is_none());
        let slot = leader.tick().expect("fourth tick seals slot 0");
        assert_eq!(slot.slot, 0);
        assert_eq!(leader.ledger().len(), 1);
    }
}
