//! Custos: audit ledger operator CLI
//!
//! Opens the configured chain store, rehydrates the ledger, and runs one
//! command against it.  All read commands print JSON in the same shapes the
//! portal UI consumes.
//!
//! Usage:
//!   custos --config custos.toml verify
//!   custos append --actor u1 --action LOGIN_SUCCESS --ip 10.0.0.5 --details '{"username":"alice"}'
//!   custos recent --limit 5
//!   custos tamper --index 1
//!   custos simulate --workers 4 --events 25

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use custos_config::LedgerConfig;
use custos_contracts::{block_schema, AuditAction, AuditDetails, CustosResult, StartupPolicy};
use custos_core::{ChainStore, Ledger};
use custos_store::{BoundedStore, InMemoryChainStore, JsonlChainStore};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Custos: tamper-evident audit ledger for the RBAC portal.
#[derive(Parser)]
#[command(
    name = "custos",
    about = "Custos audit ledger operator CLI",
    long_about = "Appends to, inspects, and verifies the hash-linked audit chain\n\
                  that records every security-relevant action in the portal."
)]
struct Cli {
    /// Ledger configuration file (TOML).  Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seal and persist one audit event.
    Append {
        /// Principal performing the action ("system" / "unknown" if none).
        #[arg(long, default_value = "unknown")]
        actor: String,
        /// Action tag, e.g. LOGIN_SUCCESS.  Unknown tags are accepted.
        #[arg(long)]
        action: String,
        /// Source network address.
        #[arg(long, default_value = "127.0.0.1")]
        ip: String,
        /// Details as a JSON object.  Non-JSON text is recorded as a string.
        #[arg(long)]
        details: Option<String>,
    },
    /// Print the full chain, genesis first.
    Chain,
    /// Print the most recent blocks, newest first.
    Recent {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Verify chain integrity.
    Verify,
    /// Print chain statistics.
    Stats,
    /// Print the JSON Schema of the block wire shape.
    Schema,
    /// Tamper with one block in memory and show that verification catches it.
    Tamper {
        #[arg(long)]
        index: u64,
    },
    /// Drive the ledger from concurrent workers emitting portal events.
    Simulate {
        #[arg(long, default_value_t = 4)]
        workers: usize,
        #[arg(long, default_value_t = 25)]
        events: usize,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CustosResult<()> {
    // Needs no ledger.
    if let Command::Schema = cli.command {
        print_json(&block_schema());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => LedgerConfig::from_file(path)?,
        None => LedgerConfig::default(),
    };

    let ledger = open_ledger(&config)?;
    ledger.initialize()?;

    match cli.command {
        Command::Append { actor, action, ip, details } => {
            let block = ledger.append(&actor, action.as_str(), &ip, parse_details(details))?;
            print_json(&block);
        }
        Command::Chain => print_json(&ledger.get_chain()),
        Command::Recent { limit } => print_json(&ledger.get_recent(limit)),
        Command::Verify => print_json(&ledger.verify()),
        Command::Stats => print_json(&ledger.stats()),
        Command::Schema => print_json(&block_schema()),
        Command::Tamper { index } => {
            let before = ledger.verify();
            let tampered = ledger.simulate_tamper(index)?;
            let after = ledger.verify();
            print_json(&json!({
                "tamperedBlock": tampered,
                "before": before,
                "after": after,
                "note": "tampering is applied in memory only and is never persisted",
            }));
        }
        Command::Simulate { workers, events } => {
            simulate(Arc::new(ledger), workers, events);
        }
    }

    Ok(())
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn open_ledger(config: &LedgerConfig) -> CustosResult<Ledger> {
    let store: Box<dyn ChainStore> = match JsonlChainStore::open(config.store_path()) {
        Ok(store) => Box::new(BoundedStore::new(store, config.store_timeout())),
        Err(e) if config.startup_policy() == StartupPolicy::FallbackGenesis => {
            warn!(
                error = %e,
                "chain store could not be opened; audit events will NOT be persisted this run"
            );
            Box::new(InMemoryChainStore::new())
        }
        Err(e) => return Err(e),
    };

    Ok(Ledger::new(store, config.sealer(), config.startup_policy()))
}

fn parse_details(raw: Option<String>) -> AuditDetails {
    match raw {
        None => AuditDetails::empty(),
        Some(text) => match serde_json::from_str::<Value>(&text) {
            Ok(value) => AuditDetails::from(value),
            Err(_) => AuditDetails::from(Value::String(text)),
        },
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("failed to render output: {}", e),
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// One representative event per portal collaborator.
static PORTAL_EVENTS: [(AuditAction, &str); 8] = [
    (AuditAction::LoginSuccess, "authentication"),
    (AuditAction::TokenValidated, "authentication"),
    (AuditAction::ViewResource, "resources"),
    (AuditAction::UpdateResource, "resources"),
    (AuditAction::UnauthorizedAccess, "authorization"),
    (AuditAction::PermissionAssigned, "roles"),
    (AuditAction::IpAutoBlocked, "ip-reputation"),
    (AuditAction::LoginFailed, "authentication"),
];

fn simulate(ledger: Arc<Ledger>, workers: usize, events: usize) {
    info!(workers, events, "starting audit simulation");

    let handles: Vec<_> = (0..workers)
        .map(|worker| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                let actor = format!("user-{worker}");
                let ip = format!("10.0.{}.{}", worker / 256, worker % 256);
                let mut recorded = 0usize;
                for n in 0..events {
                    let (action, source) = &PORTAL_EVENTS[(worker + n) % PORTAL_EVENTS.len()];
                    let details = AuditDetails::from(json!({ "source": source, "sequence": n }));
                    if ledger.record(&actor, action.clone(), &ip, details).is_some() {
                        recorded += 1;
                    }
                }
                recorded
            })
        })
        .collect();

    let recorded: usize = handles
        .into_iter()
        .map(|h| h.join().unwrap_or(0))
        .sum();

    print_json(&json!({
        "recorded": recorded,
        "verification": ledger.verify(),
        "stats": ledger.stats(),
    }));
}
