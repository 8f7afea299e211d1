// ---------------------------------------------------------------------------
// Wire DTOs — the transport-facing request/response shapes. Entry/Slot/
// Transfer already serialize directly (ledger.rs, transaction.rs); these
// are the thin envelopes around them for the handful of endpoints the
// core exposes to a transport layer.
//
// Reference: examples/rohallah12-Solana-Mini/src/runtime/rpc.rs (the
//            ad-hoc serde_json::Value parsing there is replaced with
//            typed request/response structs, generalized past a single
//            byte-identifier `/transfer` body).
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::hash::Hash;
use crate::keys::PublicKey;
use crate::ledger::Slot;

#[derive(Serialize, Deserialize)]
pub struct PohResponse {
    pub hash: Hash,
}

#[derive(Serialize, Deserialize)]
pub struct BankResponse {
    pub balances: HashMap<PublicKey, u64>,
}

#[derive(Serialize, Deserialize)]
pub struct LedgerResponse {
    pub slots: Vec<Slot>,
}

#[derive(Serialize, Deserialize)]
pub struct AirdropRequest {
    pub pubkey: PublicKey,
    pub amount: u64,
}

#[derive(Serialize, Deserialize)]
pub struct IngestRequest {
    pub slots: Vec<Slot>,
}

#[derive(Serialize, Deserialize)]
pub struct IngestResponse {
    pub accepted: u64,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
