//! Inventory scan run: load the device list, scan every device, print a
//! summary and write a JSON snapshot.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::error;

use netinvent::scanner::{ScanOutcome, Scanner};
use netinvent::storage;
use netinvent::Inventory;

const DEFAULT_INVENTORY: &str = "config/devices.yaml";
const OUTPUT_DIR: &str = "output";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let inventory_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INVENTORY));

    let mut inventory = match Inventory::load(&inventory_path) {
        Ok(inventory) => inventory,
        Err(err) => {
            error!(
                "failed to load inventory from {}: {err}",
                inventory_path.display()
            );
            return ExitCode::FAILURE;
        }
    };

    println!("{inventory}");

    let scanner = Scanner::new();
    let outcomes = scanner.scan_all(inventory.devices_mut()).await;

    let mut succeeded = 0usize;
    let mut partial = 0usize;
    let mut failed = 0usize;

    println!("Scan results:");
    for (device, outcome) in inventory.devices().iter().zip(&outcomes) {
        match outcome {
            ScanOutcome::Success { .. } => {
                succeeded += 1;
                println!("  {}: success", device.hostname);
            }
            ScanOutcome::Partial { .. } => {
                partial += 1;
                println!("  {}: partial (version output not recognized)", device.hostname);
            }
            ScanOutcome::Failed { error, .. } => {
                failed += 1;
                println!("  {}: failed ({error})", device.hostname);
            }
        }
    }
    println!("\n{succeeded} succeeded, {partial} partial, {failed} failed");

    // Per-device failures never change the exit code; only an unloadable
    // inventory does.
    if let Err(err) = storage::write_snapshot(Path::new(OUTPUT_DIR), inventory.devices()) {
        error!("failed to write snapshot: {err}");
    }

    ExitCode::SUCCESS
}
