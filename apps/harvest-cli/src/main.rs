//! # Harvest Field Client
//!
//! Records one harvest entry from the command line.
//!
//! ## Usage
//! ```bash
//! # Record 2.5 kg of Tulsi at a fixed position
//! HARVEST_LAT=12.97 HARVEST_LNG=77.59 \
//!     cargo run -p harvest-cli -- --crop Tulsi --kg 2.5 --operator F-100
//!
//! # Use a specific config file
//! cargo run -p harvest-cli -- --config ./harvest.toml --crop Neem --kg 4 --operator F-7
//! ```
//!
//! ## Run Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration
//! 3. Wire capability providers (env GPS, stdout clipboard, simulated ledger)
//! 4. Fill the form, capture a fix, submit
//! 5. Print and share the verification link

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use harvest_core::{CropType, HarvestField};
use harvest_flow::{
    Capabilities, CapabilityError, Clipboard, HarvestConfig, HarvestSubmissionFlow,
    LocationProvider, Position, ShareOutcome, SimulatedLedger,
};
use tracing::{info, Subscriber};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

// =============================================================================
// Host Providers
// =============================================================================

/// Reads the position from `HARVEST_LAT` / `HARVEST_LNG` on every request.
struct EnvLocation;

#[async_trait]
impl LocationProvider for EnvLocation {
    async fn current_position(&self) -> Result<Position, CapabilityError> {
        let (Ok(lat), Ok(lng)) = (env::var("HARVEST_LAT"), env::var("HARVEST_LNG")) else {
            return Err(CapabilityError::Unavailable);
        };
        let parse = |raw: &str, name: &str| {
            raw.trim()
                .parse::<f64>()
                .map_err(|_| CapabilityError::Failed(format!("{name} is not a number: '{raw}'")))
        };
        Ok(Position {
            latitude: parse(&lat, "HARVEST_LAT")?,
            longitude: parse(&lng, "HARVEST_LNG")?,
        })
    }
}

/// Terminal "clipboard": prints the text for the user to copy.
struct StdoutClipboard;

#[async_trait]
impl Clipboard for StdoutClipboard {
    async fn copy_text(&self, text: &str) -> Result<(), CapabilityError> {
        println!("Link: {}", text);
        Ok(())
    }
}

// =============================================================================
// Entry Point
// =============================================================================

#[derive(Default)]
struct Args {
    crop: String,
    kg: String,
    operator: String,
    config: Option<PathBuf>,
}

fn print_help() {
    println!("Harvest Tracker Field Client");
    println!();
    println!("Usage: harvest [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --crop <NAME>        Crop type ({})", CropType::labels().join(", "));
    println!("  --kg <QUANTITY>      Harvested quantity in kilograms");
    println!("  --operator <ID>      Operator identifier");
    println!("  --config <PATH>      Config file (default: platform config dir)");
    println!("  -h, --help           Show this help message");
    println!();
    println!("Location is read from HARVEST_LAT and HARVEST_LNG.");
}

/// Returns `None` when help was requested.
fn parse_args() -> Option<Args> {
    let argv: Vec<String> = env::args().collect();
    let mut args = Args::default();

    let mut i = 1;
    while i < argv.len() {
        let value = argv.get(i + 1).cloned();
        match argv[i].as_str() {
            "--crop" => {
                args.crop = value.unwrap_or_default();
                i += 1;
            }
            "--kg" => {
                args.kg = value.unwrap_or_default();
                i += 1;
            }
            "--operator" => {
                args.operator = value.unwrap_or_default();
                i += 1;
            }
            "--config" => {
                args.config = value.map(PathBuf::from);
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                return None;
            }
            _ => {}
        }
        i += 1;
    }
    Some(args)
}

const DEFAULT_LOG_FILTER: &str = "info,harvest=debug";

fn log_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt().with_env_filter(filter).finish()
}

/// Logging setup; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    log_subscriber(filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(args) = parse_args() else {
        return Ok(());
    };

    init_tracing();

    let config = HarvestConfig::load_or_default(args.config);
    info!(device_id = config.device_id(), "Harvest client starting");

    let capabilities =
        Capabilities::ledger_only(Arc::new(SimulatedLedger::from_config(&config)))
            .with_location(Arc::new(EnvLocation))
            .with_clipboard(Arc::new(StdoutClipboard));
    let mut flow = HarvestSubmissionFlow::new(&config, capabilities)?;

    flow.update_field(HarvestField::CropType, &args.crop)?;
    flow.update_field(HarvestField::QuantityKg, &args.kg)?;
    flow.update_field(HarvestField::OperatorId, &args.operator)?;

    let fix = flow.capture_location().await?;
    println!("Captured {}", fix);

    if !flow.can_submit() {
        for problem in flow.view().problems {
            eprintln!("  - {}", problem);
        }
        return Err("harvest entry is incomplete".into());
    }

    println!("Submitting to ledger...");
    let result = flow.submit().await?;
    println!("Batch ID: {}", result.batch_id);

    if let Some(links) = flow.links() {
        println!("Scan: {}", links.scan_image_url);
    }

    match flow.share().await? {
        ShareOutcome::Shared => println!("Verification link shared"),
        ShareOutcome::Copied => println!("Verification link ready to copy"),
    }

    Ok(())
}
