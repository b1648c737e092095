//! Timestamped JSON snapshot files.
//!
//! One file per run: `inventory_<YYYYMMDD_HHMMSS>.json`, holding a
//! metadata header and every device record, with absent optional fields
//! serialized as `null`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;
use serde::Serialize;

use crate::error::{Result, StorageError};
use crate::inventory::Device;

/// Snapshot format version.
const SNAPSHOT_VERSION: &str = "1.0";

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    metadata: Metadata,
    devices: &'a [Device],
}

#[derive(Debug, Serialize)]
struct Metadata {
    generated_at: String,
    device_count: usize,
    version: &'static str,
}

/// Write a snapshot of all devices into `dir`, creating it if needed.
/// Returns the path of the written file.
pub fn write_snapshot(dir: &Path, devices: &[Device]) -> Result<PathBuf> {
    let now = Local::now();

    fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let filename = format!("inventory_{}.json", now.format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);

    let snapshot = Snapshot {
        metadata: Metadata {
            generated_at: now.to_rfc3339(),
            device_count: devices.len(),
            version: SNAPSHOT_VERSION,
        },
        devices,
    };

    let json = serde_json::to_string_pretty(&snapshot).map_err(StorageError::Serialize)?;
    fs::write(&path, json).map_err(|source| StorageError::Write {
        path: path.clone(),
        source,
    })?;

    info!("inventory snapshot saved to {}", path.display());
    Ok(path)
}
