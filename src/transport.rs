// ---------------------------------------------------------------------------
// Transport — the HTTP surface over a Leader or a Validator.
//
// Deliberately kept separate from the core coordinators: parse, call
// into the core, serialize the response. No core state is locked for
// longer than one request.
//
// Reference: examples/rohallah12-Solana-Mini/src/runtime/rpc.rs
//            (tiny_http server loop, ticker thread, Arc<Mutex<..>>
//            sharing), generalized from one hardcoded /transfer handler
//            into a full endpoint table.
// ---------------------------------------------------------------------------

use std::io::Read as _;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{error, info};
use tiny_http::{Method, Request, Response, Server};

use crate::config::Config;
use crate::leader::Leader;
use crate::validator::Validator;
use crate::wire::{
    AirdropRequest, BankResponse, ErrorResponse, IngestRequest, IngestResponse, LedgerResponse,
    PohResponse,
};

/// How often the leader's background ticker advances PoH. Purely a
/// demo-friendly default — real timing is calibrated to hardware.
const TICK_INTERVAL: Duration = Duration::from_millis(200);

pub fn run_leader(config: Config) {
    let leader = Arc::new(Mutex::new(Leader::with_window_capacity(
        config.slot,
        config.recent_hash_window,
    )));

    let ticker_leader = Arc::clone(&leader);
    std::thread::spawn(move || loop {
        {
            let mut leader = ticker_leader.lock().unwrap();
            leader.tick();
        }
        std::thread::sleep(TICK_INTERVAL);
    });

    let server = Server::http(&config.bind_addr).expect("failed to bind leader address");
    info!("leader listening on http://{}", config.bind_addr);

    for mut request in server.incoming_requests() {
        let response = match (request.method(), request.url()) {
            (Method::Get, "/health") => json_ok(200, &()),
            (Method::Get, "/poh") => {
                let leader = leader.lock().unwrap();
                json_ok(200, &PohResponse { hash: leader.poh_snapshot() })
            }
            (Method::Get, "/bank") => {
                let leader = leader.lock().unwrap();
                json_ok(200, &BankResponse { balances: leader.bank().balances().clone() })
            }
            (Method::Get, "/ledger") => {
                let leader = leader.lock().unwrap();
                json_ok(200, &LedgerResponse { slots: leader.ledger().to_vec() })
            }
            (Method::Post, "/airdrop") => handle_airdrop(&mut request, &leader),
            (Method::Post, "/transfer") => handle_transfer(&mut request, &leader),
            _ => json_err(404, "not found"),
        };
        let _ = request.respond(response);
    }
}

pub fn run_validator(config: Config) {
    let validator = Arc::new(Mutex::new(Validator::with_window_capacity(
        config.recent_hash_window,
    )));

    let server = Server::http(&config.bind_addr).expect("failed to bind validator address");
    info!("validator listening on http://{}", config.bind_addr);

    for mut request in server.incoming_requests() {
        let response = match (request.method(), request.url()) {
            (Method::Get, "/health") => json_ok(200, &()),
            (Method::Get, "/bank") => {
                let validator = validator.lock().unwrap();
                json_ok(200, &BankResponse { balances: validator.bank().balances().clone() })
            }
            (Method::Get, "/ledger") => {
                let validator = validator.lock().unwrap();
                json_ok(200, &LedgerResponse { slots: validator.ledger().to_vec() })
            }
            (Method::Post, "/ingest") => handle_ingest(&mut request, &validator),
            _ => json_err(404, "not found"),
        };
        let _ = request.respond(response);
    }
}

fn handle_airdrop(
    request: &mut Request,
    leader: &Arc<Mutex<Leader>>,
) -> Response<std::io::Cursor<Vec<u8>>> {
    let req: AirdropRequest = match read_json(request) {
        Ok(v) => v,
        Err(e) => return json_err(400, &e),
    };

    let mut leader = leader.lock().unwrap();
    match leader.airdrop(req.pubkey, req.amount) {
        Ok(hash) => json_ok(200, &PohResponse { hash }),
        Err(e) => {
            error!("airdrop rejected: {e}");
            json_err(400, &e.to_string())
        }
    }
}

fn handle_transfer(
    request: &mut Request,
    leader: &Arc<Mutex<Leader>>,
) -> Response<std::io::Cursor<Vec<u8>>> {
    let transfer = match read_json(request) {
        Ok(v) => v,
        Err(e) => return json_err(400, &e),
    };

    let mut leader = leader.lock().unwrap();
    match leader.admit_transfer(transfer) {
        Ok(hash) => json_ok(200, &PohResponse { hash }),
        Err(e) => {
            error!("transfer rejected: {e}");
            json_err(400, &e.to_string())
        }
    }
}

fn handle_ingest(
    request: &mut Request,
    validator: &Arc<Mutex<Validator>>,
) -> Response<std::io::Cursor<Vec<u8>>> {
    let req: IngestRequest = match read_json(request) {
        Ok(v) => v,
        Err(e) => return json_err(400, &e),
    };

    let mut validator = validator.lock().unwrap();
    let (accepted, error) = validator.ingest(req.slots);
    json_ok(
        200,
        &IngestResponse { accepted, error: error.map(|e| e.to_string()) },
    )
}

fn read_json<T: serde::de::DeserializeOwned>(request: &mut Request) -> Result<T, String> {
    let mut body = String::new();
    request
        .as_reader()
        .read_to_string(&mut body)
        .map_err(|e| format!("could not read body: {e}"))?;
    serde_json::from_str(&body).map_err(|e| format!("invalid request body: {e}"))
}

fn json_ok<T: serde::Serialize>(code: u32, body: &T) -> Response<std::io::Cursor<Vec<u8>>> {
    let payload = serde_json::to_string(body).expect("response type always serializes");
    Response::from_string(payload)
        .with_status_code(code)
        .with_header("Content-Type: application/json".parse::<tiny_http::Header>().unwrap())
}

fn json_err(code: u32, message: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    json_ok(code, &ErrorResponse { error: message.to_string() })
}
