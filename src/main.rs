// ---------------------------------------------------------------------------
// CLI entry point — two subcommands, `leader` and `validator`, each
// standing up the corresponding coordinator behind the HTTP transport
// (src/transport.rs).
//
// Reference: examples/rohallah12-Solana-Mini/src/main.rs (process entry
//            shape), examples/crossdev24-solana/clap-utils (derive-based
//            subcommands over hand-rolled arg parsing).
// ---------------------------------------------------------------------------

use clap::{Parser, Subcommand};

use poh_ledger::config::Config;
use poh_ledger::ledger::SlotConfig;
use poh_ledger::transport;

#[derive(Parser)]
#[command(name = "poh_ledger", about = "A minimal proof-of-history ledger")]
struct Cli {
    #[command(subcommand)]
    role: Role,
}

#[derive(Subcommand)]
enum Role {
    /// Run as the leader: owns the PoH clock and the bank of record.
    Leader {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, default_value_t = 64)]
        ticks_per_slot: u64,
        #[arg(long, default_value_t = 64)]
        hashes_per_tick: u64,
        #[arg(long, default_value_t = poh_ledger::bank::DEFAULT_RECENT_HASH_WINDOW)]
        recent_hash_window: usize,
    },
    /// Run as a validator: replays slots ingested from a leader.
    Validator {
        #[arg(long, default_value = "0.0.0.0:8081")]
        bind: String,
        #[arg(long, default_value_t = poh_ledger::bank::DEFAULT_RECENT_HASH_WINDOW)]
        recent_hash_window: usize,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.role {
        Role::Leader {
            bind,
            ticks_per_slot,
            hashes_per_tick,
            recent_hash_window,
        } => {
            let config = Config {
                slot: SlotConfig {
                    ticks_per_slot,
                    hashes_per_tick,
                },
                recent_hash_window,
                bind_addr: bind,
            };
            transport::run_leader(config);
        }
        Role::Validator { bind, recent_hash_window } => {
            let config = Config {
                recent_hash_window,
                bind_addr: bind,
                ..Config::default()
            };
            transport::run_validator(config);
        }
    }
}
