// ---------------------------------------------------------------------------
// Config — the policy knobs (ticks_per_slot, hashes_per_tick,
// recent-hash window size) plus the transport bind address. Populated
// once at process start from CLI flags (src/main.rs) and threaded
// down; nothing in the core modules reads ambient global state.
//
// Reference: the corpus convention of a thin struct built once by clap
//            and passed down, as in
//            examples/crossdev24-solana/clap-utils.
// ---------------------------------------------------------------------------

use crate::bank::DEFAULT_RECENT_HASH_WINDOW;
use crate::ledger::SlotConfig;

#[derive(Clone, Debug)]
pub struct Config {
    pub slot: SlotConfig,
    pub recent_hash_window: usize,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            slot: SlotConfig::default(),
            recent_hash_window: DEFAULT_RECENT_HASH_WINDOW,
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}
