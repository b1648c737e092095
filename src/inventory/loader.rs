//! YAML inventory file loading.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;

use super::device::Device;
use crate::error::{ConfigError, Result};

/// One raw entry under the top-level `devices:` key.
#[derive(Debug, Deserialize)]
struct DeviceEntry {
    hostname: String,
    mgmt_ip: String,
    site: String,
    role: String,
    #[serde(default)]
    vendor: Option<String>,
    #[serde(default)]
    os_type: Option<String>,
    #[serde(default)]
    os_version: Option<String>,
    #[serde(default)]
    username_env: Option<String>,
    #[serde(default)]
    password_env: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InventoryFile {
    devices: Vec<DeviceEntry>,
}

/// The device list for one run, in file order.
#[derive(Debug)]
pub struct Inventory {
    devices: Vec<Device>,
}

impl Inventory {
    /// Load an inventory from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let inventory = Self::from_yaml(&text)?;
        info!(
            "loaded {} devices from {}",
            inventory.device_count(),
            path.display()
        );
        Ok(inventory)
    }

    /// Parse an inventory from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let file: InventoryFile = serde_yaml::from_str(text).map_err(ConfigError::Parse)?;

        let mut seen = HashSet::new();
        let mut devices = Vec::with_capacity(file.devices.len());
        for entry in file.devices {
            let device = entry.into_device();
            if !seen.insert(device.hostname.clone()) {
                return Err(ConfigError::DuplicateHostname {
                    hostname: device.hostname,
                }
                .into());
            }
            devices.push(device);
        }

        Ok(Self { devices })
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut [Device] {
        &mut self.devices
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Found {} devices:", self.device_count())?;
        for device in &self.devices {
            writeln!(f, "{device}")?;
        }
        Ok(())
    }
}

impl DeviceEntry {
    fn into_device(self) -> Device {
        let mut device = Device::new(
            self.hostname.trim(),
            self.mgmt_ip.trim(),
            self.site.trim(),
            self.role.trim(),
            normalize(self.os_type),
        );
        device.vendor = normalize(self.vendor);
        device.os_version = normalize(self.os_version);
        device.username_env = normalize(self.username_env);
        device.password_env = normalize(self.password_env);
        device
    }
}

/// Trim an optional field, treating an empty value as absent.
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
