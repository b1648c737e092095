//! # netinvent
//!
//! Network device inventory scanner.
//!
//! Loads a YAML device list, connects to each device over SSH, retrieves
//! `show version` and `show inventory` output, extracts structured fields
//! (model, serial number, OS version, uptime, hostname) from the
//! unstructured text, and persists the results as a timestamped JSON
//! snapshot.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use netinvent::{Inventory, Scanner, storage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), netinvent::Error> {
//!     let mut inventory = Inventory::load("config/devices.yaml")?;
//!
//!     let scanner = Scanner::new();
//!     let outcomes = scanner.scan_all(inventory.devices_mut()).await;
//!     println!("{} devices scanned", outcomes.len());
//!
//!     storage::write_snapshot("output".as_ref(), inventory.devices())?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod inventory;
pub mod maintenance;
pub mod parser;
pub mod scanner;
pub mod session;
pub mod storage;

// Re-export main types for convenience
pub use error::Error;
pub use inventory::{Device, Inventory, ScanStatus};
pub use parser::{VersionInfo, parse_show_version};
pub use scanner::{ScanOutcome, Scanner};
pub use session::{DeviceSession, Session, SessionStatus};
