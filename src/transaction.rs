// ---------------------------------------------------------------------------
// Transfer — the one transaction type this ledger knows about.
//
// A Transfer moves `amount` from `from` to `to`, anchored to a recent PoH
// hash and authorized by an Ed25519 signature over the canonical message
// (see `canonical_message`). Admission checks amount, recent-hash
// membership, anti-replay, signature, and sufficient funds, in that
// order.
//
// Reference: examples/rohallah12-Solana-Mini/src/runtime/bank.rs (signature
//            verification shape), generalized from message/account-index
//            signing to a single signed Transfer.
// ---------------------------------------------------------------------------

use ed25519_dalek::Verifier;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hash::Hash;
use crate::keys::{PublicKey, Signature};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: PublicKey,
    pub to: PublicKey,
    pub amount: u64,
    pub recent_hash: Hash,
    pub sig: Signature,
}

impl Transfer {
    pub fn new(
        from: PublicKey,
        to: PublicKey,
        amount: u64,
        recent_hash: Hash,
        sig: Signature,
    ) -> Self {
        Transfer {
            from,
            to,
            amount,
            recent_hash,
            sig,
        }
    }

    /// The bytes signed by `from`. Built by concatenation, not through a
    /// JSON library, so leader and validator can never disagree on
    /// field order or whitespace.
    pub fn canonical_message(&self) -> String {
        canonical_message(self.from, self.to, self.amount, self.recent_hash)
    }
}

/// The exact signed-message string for a transfer's fields. Key order,
/// absence of whitespace, and absence of a trailing newline are all part
/// of the wire contract — every byte here must match on both sides.
pub fn canonical_message(from: PublicKey, to: PublicKey, amount: u64, recent_hash: Hash) -> String {
    format!(
        "{{\"from\":\"{}\",\"to\":\"{}\",\"amount\":{},\"recent_hash\":\"{}\"}}",
        from.to_hex(),
        to.to_hex(),
        amount,
        recent_hash.to_hex()
    )
}

/// The payload mixed into PoH for a batch of transfers: SHA-256 of every
/// signature's 64 bytes, concatenated in admission order.
pub fn batch_hash(transfers: &[Transfer]) -> Hash {
    let mut bytes = Vec::with_capacity(transfers.len() * 64);
    for t in transfers {
        bytes.extend_from_slice(&t.sig.0);
    }
    crate::hash::sha256(&bytes)
}

/// The failure kinds admission can produce, all surfaced to the caller
/// without mutating state.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum TransactionError {
    #[error("malformed transfer: {0}")]
    Malformed(String),
    #[error("signature does not verify")]
    InvalidSignature,
    #[error("recent_hash is not in the window")]
    UnknownRecentHash,
    #[error("signature already admitted")]
    DuplicateSignature,
    #[error("source balance is less than amount")]
    InsufficientFunds,
}

impl From<crate::bank::BankError> for TransactionError {
    fn from(e: crate::bank::BankError) -> Self {
        match e {
            crate::bank::BankError::InsufficientFunds => TransactionError::InsufficientFunds,
            crate::bank::BankError::Overflow => {
                TransactionError::Malformed("amount would overflow".into())
            }
        }
    }
}

/// Amount is positive, and the Ed25519 signature verifies over the
/// canonical message under `from`. Recent-hash membership, anti-replay,
/// and sufficient funds are checked by the bank/leader/validator, which
/// hold the shared state those checks need.
pub fn verify_shape_and_signature(t: &Transfer) -> Result<(), TransactionError> {
    check_amount(t)?;
    verify_signature(t)
}

/// `amount > 0`.
pub fn check_amount(t: &Transfer) -> Result<(), TransactionError> {
    if t.amount == 0 {
        Err(TransactionError::Malformed("amount must be > 0".into()))
    } else {
        Ok(())
    }
}

/// Ed25519 verification of `sig` over the canonical message under
/// `from`.
pub fn verify_signature(t: &Transfer) -> Result<(), TransactionError> {
    let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(&t.from.0)
        .map_err(|_| TransactionError::Malformed("from is not a valid Ed25519 key".into()))?;
    let signature = ed25519_dalek::Signature::from_bytes(&t.sig.0);

    verifying_key
        .verify(t.canonical_message().as_bytes(), &signature)
        .map_err(|_| TransactionError::InvalidSignature)
}
