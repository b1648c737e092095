//! Device inventory: records, YAML loading and credential resolution.

pub mod credentials;
mod device;
mod loader;

pub use credentials::{CredentialSource, Credentials};
pub use device::{Device, ScanStatus};
pub use loader::Inventory;
