// ---------------------------------------------------------------------------
// Bank — account balances, anti-replay bookkeeping, and the recent-hash
// window transfers must anchor to.
//
// Three pieces of state live here because they age out together: a
// transfer's signature is only remembered for as long as some hash in
// the window still vouches for it.
//
// Reference: examples/rohallah12-Solana-Mini/src/runtime/accounts_db.rs
//            (load/store shape, generalized from AccountSharedData to a
//            plain balance).
// ---------------------------------------------------------------------------

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

use crate::hash::Hash;
use crate::keys::{keypair_from_seed_byte, PublicKey, Signature};
use crate::transaction::Transfer;

/// Default size of the recent-hash window: generous enough that a slow
/// client's `recent_hash` rarely ages out before it lands.
pub const DEFAULT_RECENT_HASH_WINDOW: usize = 150;

/// The well-known mint key airdrops are recorded as transfers from:
/// pre-funded at genesis so ordinary `apply_transfer` accounting covers
/// airdrops with no special case, and validators converge on them like
/// any other transfer in the slot stream.
pub fn mint_keypair() -> (PublicKey, ed25519_dalek::SigningKey) {
    keypair_from_seed_byte(0xFF)
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum BankError {
    #[error("source balance is less than amount")]
    InsufficientFunds,
    #[error("balance would overflow")]
    Overflow,
}

/// Mapping PublicKey -> Amount. Absent keys read as balance 0; debiting
/// an absent key is InsufficientFunds unless the amount is 0 (which is
/// rejected earlier, at the transaction-shape check).
#[derive(Default, Clone)]
pub struct Bank {
    balances: HashMap<PublicKey, u64>,
}

impl Bank {
    pub fn new() -> Self {
        Bank {
            balances: HashMap::new(),
        }
    }

    pub fn get(&self, pubkey: &PublicKey) -> u64 {
        self.balances.get(pubkey).copied().unwrap_or(0)
    }

    /// Credit `pubkey` by `amount`, creating the account if absent.
    pub fn credit(&mut self, pubkey: PublicKey, amount: u64) -> Result<(), BankError> {
        let entry = self.balances.entry(pubkey).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(BankError::Overflow)?;
        Ok(())
    }

    /// Atomically check `balance[from] >= amount` and move it to `to`.
    /// All-or-nothing: on InsufficientFunds or Overflow neither balance
    /// is touched.
    pub fn apply_transfer(&mut self, t: &Transfer) -> Result<(), BankError> {
        let from_balance = self.get(&t.from);
        if from_balance < t.amount {
            return Err(BankError::InsufficientFunds);
        }
        let to_balance = self.get(&t.to);
        let new_to = to_balance.checked_add(t.amount).ok_or(BankError::Overflow)?;

        // from == to is permitted but pointless: compute both updates
        // before writing so a self-transfer leaves the balance unchanged
        // rather than being clobbered by insertion order.
        if t.from == t.to {
            return Ok(());
        }

        self.balances.insert(t.from, from_balance - t.amount);
        self.balances.insert(t.to, new_to);
        Ok(())
    }

    /// Snapshot of every known balance, for the `/bank` read.
    pub fn balances(&self) -> &HashMap<PublicKey, u64> {
        &self.balances
    }
}

/// Bounded ring of the last N distinct PoH hashes a transfer may anchor
/// to. O(1) membership via a side map, O(1) eviction from the front.
/// The side map also answers "which slot introduced this hash" so
/// SeenSignatures can attribute and later batch-evict by that slot.
#[derive(Clone)]
pub struct RecentHashWindow {
    capacity: usize,
    ring: VecDeque<(Hash, u64)>,
    member: HashMap<Hash, u64>,
}

impl RecentHashWindow {
    pub fn new(capacity: usize) -> Self {
        RecentHashWindow {
            capacity,
            ring: VecDeque::with_capacity(capacity),
            member: HashMap::with_capacity(capacity),
        }
    }

    /// Record a newly-produced entry hash at `slot`. Returns the
    /// evicted `(hash, slot)` pair, if the window was full.
    pub fn insert(&mut self, hash: Hash, slot: u64) -> Option<(Hash, u64)> {
        if self.member.contains_key(&hash) {
            return None;
        }
        self.ring.push_back((hash, slot));
        self.member.insert(hash, slot);

        if self.ring.len() > self.capacity {
            let evicted = self.ring.pop_front();
            if let Some((h, _)) = evicted {
                self.member.remove(&h);
            }
            evicted
        } else {
            None
        }
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.member.contains_key(hash)
    }

    /// The slot that introduced `hash`, if it is still in the window.
    pub fn slot_of(&self, hash: &Hash) -> Option<u64> {
        self.member.get(hash).copied()
    }
}

/// Set of signatures admitted within the recent-hash window, indexed by
/// the slot their `recent_hash` was introduced at so a window eviction
/// can batch-evict the signatures it no longer vouches for.
#[derive(Default, Clone)]
pub struct SeenSignatures {
    by_slot: HashMap<u64, HashSet<Signature>>,
    all: HashSet<Signature>,
}

impl SeenSignatures {
    pub fn new() -> Self {
        SeenSignatures {
            by_slot: HashMap::new(),
            all: HashSet::new(),
        }
    }

    pub fn contains(&self, sig: &Signature) -> bool {
        self.all.contains(sig)
    }

    /// Record `sig` as admitted, attributed to the slot that introduced
    /// the `recent_hash` it referenced.
    pub fn insert(&mut self, sig: Signature, recent_hash_slot: u64) {
        self.all.insert(sig);
        self.by_slot.entry(recent_hash_slot).or_default().insert(sig);
    }

    /// Evict every signature attributed to `slot` (called when the
    /// recent-hash window evicts that slot's hash).
    pub fn evict_slot(&mut self, slot: u64) {
        if let Some(sigs) = self.by_slot.remove(&slot) {
            for sig in sigs {
                self.all.remove(&sig);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256;
    use crate::keys::keypair_from_seed_byte;
    use ed25519_dalek::Signer;

    fn transfer(seed: u8, to: PublicKey, amount: u64, recent_hash: Hash) -> Transfer {
        let (from, signing_key) = keypair_from_seed_byte(seed);
        let msg = crate::transaction::canonical_message(from, to, amount, recent_hash);
        let sig = signing_key.sign(msg.as_bytes());
        Transfer::new(from, to, amount, recent_hash, Signature(sig.to_bytes()))
    }

    #[test]
    fn credit_then_debit() {
        let mut bank = Bank::new();
        let (a, _) = keypair_from_seed_byte(1);
        let (b, _) = keypair_from_seed_byte(2);
        bank.credit(a, 1000).unwrap();

        let t = transfer(1, b, 10, sha256(b"rh"));
        bank.apply_transfer(&t).unwrap();

        assert_eq!(bank.get(&a), 990);
        assert_eq!(bank.get(&b), 10);
    }

    #[test]
    fn insufficient_funds_does_not_mutate() {
        let mut bank = Bank::new();
        let (a, _) = keypair_from_seed_byte(1);
        let (b, _) = keypair_from_seed_byte(2);
        bank.credit(a, 5).unwrap();

        let t = transfer(1, b, 10, sha256(b"rh"));
        assert_eq!(bank.apply_transfer(&t), Err(BankError::InsufficientFunds));
        assert_eq!(bank.get(&a), 5);
        assert_eq!(bank.get(&b), 0);
    }

    #[test]
    fn self_transfer_is_noop() {
        let mut bank = Bank::new();
        let (a, _) = keypair_from_seed_byte(1);
        bank.credit(a, 100).unwrap();
        let t = transfer(1, a, 10, sha256(b"rh"));
        bank.apply_transfer(&t).unwrap();
        assert_eq!(bank.get(&a), 100);
    }

    #[test]
    fn window_evicts_oldest_first() {
        let mut window = RecentHashWindow::new(2);
        let h1 = sha256(b"1");
        let h2 = sha256(b"2");
        let h3 = sha256(b"3");
        assert_eq!(window.insert(h1, 0), None);
        assert_eq!(window.insert(h2, 1), None);
        assert_eq!(window.insert(h3, 2), Some((h1, 0)));
        assert!(!window.contains(&h1));
        assert!(window.contains(&h2));
        assert!(window.contains(&h3));
    }

    #[test]
    fn seen_signatures_reject_duplicates_and_evict_by_slot() {
        let mut seen = SeenSignatures::new();
        let sig = Signature([7u8; 64]);
        assert!(!seen.contains(&sig));
        seen.insert(sig, 0);
        assert!(seen.contains(&sig));
        seen.evict_slot(0);
        assert!(!seen.contains(&sig));
    }
}
