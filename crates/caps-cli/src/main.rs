//! # caps CLI Entry Point
//!
//! Drives a capsule registry and licensing ledger persisted as a JSON
//! state file: register capsules, request/approve/refuse/cancel licenses,
//! operate the circuit breaker, and inspect state and audit events.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use sha2::{Digest, Sha256};

use caps_core::{AccountId, Amount, CapsuleLocator, ContentFingerprint, LocatorDigest};

mod store;

use store::StateFile;

/// Capsule stack CLI — content-addressed ownership registry and
/// escrow-backed licensing ledger.
#[derive(Parser, Debug)]
#[command(name = "caps", version, about)]
struct Cli {
    /// Path to the JSON state file.
    #[arg(long, global = true, default_value = "caps-state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Create a fresh state file with the given administrator.
    Init {
        /// Administrator identity (hex address).
        #[arg(long)]
        admin: String,
    },
    /// Register a capsule.
    Register {
        /// Registering principal; becomes the owner.
        #[arg(long)]
        caller: String,
        /// Content file to fingerprint; computes both the fingerprint and
        /// a sha2-256 locator digest. Mutually exclusive with explicit
        /// --fingerprint/--digest.
        #[arg(long, conflicts_with_all = ["fingerprint", "digest"])]
        content: Option<PathBuf>,
        /// Explicit content fingerprint (hex, 32 bytes).
        #[arg(long, requires = "digest")]
        fingerprint: Option<String>,
        /// Explicit locator digest (hex, 32 bytes).
        #[arg(long, requires = "fingerprint")]
        digest: Option<String>,
        /// Multihash function code of the locator digest.
        #[arg(long, default_value_t = 0x12)]
        hash_function: u8,
        /// Byte length of the locator digest.
        #[arg(long, default_value_t = 32)]
        hash_size: u8,
    },
    /// Show the capsule record for a fingerprint (sentinel if absent).
    Show {
        /// Content fingerprint (hex).
        #[arg(long)]
        fingerprint: String,
    },
    /// List capsules licensable by the caller, in registration order.
    Listings {
        /// Querying principal; their own capsules are excluded.
        #[arg(long)]
        caller: String,
    },
    /// Request a license, escrowing the attached value.
    Request {
        #[arg(long)]
        fingerprint: String,
        /// Value to escrow.
        #[arg(long)]
        value: u128,
        #[arg(long)]
        caller: String,
    },
    /// Approve a pending request (capsule owner only).
    Approve {
        #[arg(long)]
        fingerprint: String,
        #[arg(long)]
        licensee: String,
        #[arg(long)]
        caller: String,
    },
    /// Refuse a pending request (capsule owner only).
    Refuse {
        #[arg(long)]
        fingerprint: String,
        #[arg(long)]
        licensee: String,
        #[arg(long)]
        caller: String,
    },
    /// Cancel the caller's own pending request.
    Cancel {
        #[arg(long)]
        fingerprint: String,
        #[arg(long)]
        caller: String,
    },
    /// Engage the circuit breaker (administrator only).
    Halt {
        #[arg(long)]
        caller: String,
    },
    /// Disengage the circuit breaker (administrator only).
    Resume {
        #[arg(long)]
        caller: String,
    },
    /// Show the license state for a (fingerprint, licensee) pair.
    State {
        #[arg(long)]
        fingerprint: String,
        #[arg(long)]
        licensee: String,
    },
    /// Withdraw an account's released balance.
    Withdraw {
        #[arg(long)]
        account: String,
    },
    /// Print the audit event logs in operation order.
    Events,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let state_path = cli.state.clone();

    if let Commands::Init { admin } = &cli.command {
        if state_path.exists() {
            bail!("state file {} already exists", state_path.display());
        }
        let admin = AccountId::from_hex(admin)?;
        StateFile::new(admin).save(&state_path)?;
        tracing::info!(admin = %admin, path = %state_path.display(), "state initialized");
        return Ok(());
    }

    let mut state = StateFile::load(&state_path)?;
    run(&cli.command, &mut state)?;
    state.save(&state_path)
}

fn run(command: &Commands, state: &mut StateFile) -> anyhow::Result<()> {
    match command {
        // Handled before the state file is loaded.
        Commands::Init { .. } => unreachable!("init is dispatched in main"),

        Commands::Register {
            caller,
            content,
            fingerprint,
            digest,
            hash_function,
            hash_size,
        } => {
            let caller = AccountId::from_hex(caller)?;
            let (fingerprint, locator) = match content {
                Some(path) => {
                    let bytes = std::fs::read(path)
                        .with_context(|| format!("reading content file {}", path.display()))?;
                    let digest = Sha256::digest(&bytes);
                    let mut digest_bytes = [0u8; 32];
                    digest_bytes.copy_from_slice(&digest);
                    (
                        ContentFingerprint::from_content(&bytes),
                        CapsuleLocator::sha2_256(LocatorDigest::from_bytes(digest_bytes)),
                    )
                }
                None => {
                    let (Some(fingerprint), Some(digest)) = (fingerprint, digest) else {
                        bail!("either --content or both --fingerprint and --digest are required");
                    };
                    (
                        ContentFingerprint::from_hex(fingerprint)?,
                        CapsuleLocator::new(
                            LocatorDigest::from_hex(digest)?,
                            *hash_function,
                            *hash_size,
                        ),
                    )
                }
            };
            let event = state
                .registry
                .register_capsule(fingerprint, locator, caller)?;
            tracing::info!(fingerprint = %fingerprint, owner = %caller, "capsule registered");
            println!("{}", serde_json::to_string_pretty(&event)?);
        }

        Commands::Show { fingerprint } => {
            let fingerprint = ContentFingerprint::from_hex(fingerprint)?;
            let capsule = state.registry.capsule(&fingerprint);
            println!("{}", serde_json::to_string_pretty(&capsule)?);
        }

        Commands::Listings { caller } => {
            let caller = AccountId::from_hex(caller)?;
            let listings = state.ledger.licensable_capsules(&state.registry, caller);
            tracing::info!(caller = %caller, count = listings.len(), "listings queried");
            println!("{}", serde_json::to_string_pretty(&listings)?);
        }

        Commands::Request {
            fingerprint,
            value,
            caller,
        } => {
            let fingerprint = ContentFingerprint::from_hex(fingerprint)?;
            let caller = AccountId::from_hex(caller)?;
            let event = state.ledger.request_license(
                &state.registry,
                fingerprint,
                Amount::new(*value),
                caller,
            )?;
            tracing::info!(fingerprint = %fingerprint, licensee = %caller, value = *value, "license requested");
            println!("{}", serde_json::to_string_pretty(&event)?);
        }

        Commands::Approve {
            fingerprint,
            licensee,
            caller,
        } => {
            let fingerprint = ContentFingerprint::from_hex(fingerprint)?;
            let licensee = AccountId::from_hex(licensee)?;
            let caller = AccountId::from_hex(caller)?;
            let event = state.ledger.approve_license_request(
                &state.registry,
                fingerprint,
                licensee,
                caller,
            )?;
            tracing::info!(fingerprint = %fingerprint, licensee = %licensee, "license approved");
            println!("{}", serde_json::to_string_pretty(&event)?);
        }

        Commands::Refuse {
            fingerprint,
            licensee,
            caller,
        } => {
            let fingerprint = ContentFingerprint::from_hex(fingerprint)?;
            let licensee = AccountId::from_hex(licensee)?;
            let caller = AccountId::from_hex(caller)?;
            let event = state.ledger.refuse_license_request(
                &state.registry,
                fingerprint,
                licensee,
                caller,
            )?;
            tracing::info!(fingerprint = %fingerprint, licensee = %licensee, "license refused");
            println!("{}", serde_json::to_string_pretty(&event)?);
        }

        Commands::Cancel {
            fingerprint,
            caller,
        } => {
            let fingerprint = ContentFingerprint::from_hex(fingerprint)?;
            let caller = AccountId::from_hex(caller)?;
            let event = state.ledger.cancel_license_request(fingerprint, caller)?;
            tracing::info!(fingerprint = %fingerprint, licensee = %caller, "license cancelled");
            println!("{}", serde_json::to_string_pretty(&event)?);
        }

        Commands::Halt { caller } => {
            let caller = AccountId::from_hex(caller)?;
            state.ledger.stop(caller)?;
            tracing::warn!(by = %caller, "circuit breaker engaged");
            println!("halted");
        }

        Commands::Resume { caller } => {
            let caller = AccountId::from_hex(caller)?;
            state.ledger.resume(caller)?;
            tracing::info!(by = %caller, "circuit breaker disengaged");
            println!("running");
        }

        Commands::State {
            fingerprint,
            licensee,
        } => {
            let fingerprint = ContentFingerprint::from_hex(fingerprint)?;
            let licensee = AccountId::from_hex(licensee)?;
            println!("{}", state.ledger.license_state(&fingerprint, &licensee));
        }

        Commands::Withdraw { account } => {
            let account = AccountId::from_hex(account)?;
            let paid = state.ledger.withdraw(&account);
            tracing::info!(account = %account, amount = %paid, "balance withdrawn");
            println!("{paid}");
        }

        Commands::Events => {
            let registry_events = state.registry.events();
            let ledger_events = state.ledger.events();
            println!("{}", serde_json::to_string_pretty(&registry_events)?);
            println!("{}", serde_json::to_string_pretty(&ledger_events)?);
        }
    }
    Ok(())
}
