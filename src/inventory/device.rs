//! Device record and scan state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::parser::VersionInfo;

/// Result of the most recent scan attempt.
///
/// Unset until an attempt completes; once set it reflects the latest
/// attempt only - no history is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    /// Connected and version output parsed.
    Success,
    /// Connected, but version output was not recognized.
    Partial,
    /// Connection failed or the scan timed out.
    Failed,
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanStatus::Success => write!(f, "success"),
            ScanStatus::Partial => write!(f, "partial"),
            ScanStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One network device: identity from the inventory file plus the state of
/// its latest scan.
///
/// Scan-result fields start unset and are rewritten as a whole on every
/// attempt - a status transition never leaves stale fields behind.
#[derive(Debug, Clone, Serialize)]
pub struct Device {
    pub hostname: String,
    pub mgmt_ip: String,
    pub site: String,
    pub role: String,
    /// Session dialect identifier, e.g. "cisco_ios". Required for scanning.
    pub os_type: Option<String>,
    pub vendor: Option<String>,
    /// OS version as declared in the inventory file.
    pub os_version: Option<String>,

    // Scan results (latest attempt only).
    pub model: Option<String>,
    pub serial_number: Option<String>,
    /// OS version actually reported by the device.
    pub collected_os_version: Option<String>,
    pub uptime: Option<String>,
    pub last_scanned: Option<DateTime<Utc>>,
    pub scan_status: Option<ScanStatus>,

    /// Per-device credential variable overrides. Not part of the snapshot.
    #[serde(skip_serializing)]
    pub username_env: Option<String>,
    #[serde(skip_serializing)]
    pub password_env: Option<String>,
}

impl Device {
    /// Create a device with scan fields unset.
    pub fn new(
        hostname: impl Into<String>,
        mgmt_ip: impl Into<String>,
        site: impl Into<String>,
        role: impl Into<String>,
        os_type: Option<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            mgmt_ip: mgmt_ip.into(),
            site: site.into(),
            role: role.into(),
            os_type,
            vendor: None,
            os_version: None,
            model: None,
            serial_number: None,
            collected_os_version: None,
            uptime: None,
            last_scanned: None,
            scan_status: None,
            username_env: None,
            password_env: None,
        }
    }

    /// Record a successful scan, copying the parsed fields.
    pub fn record_success(&mut self, info: &VersionInfo, now: DateTime<Utc>) {
        self.clear_scan_fields();
        self.model = info.model.clone();
        self.serial_number = info.serial_number.clone();
        self.collected_os_version = Some(info.os_version.clone());
        self.uptime = info.uptime.clone();
        self.last_scanned = Some(now);
        self.scan_status = Some(ScanStatus::Success);
    }

    /// Record a scan whose version output was not recognized.
    pub fn record_partial(&mut self, now: DateTime<Utc>) {
        self.clear_scan_fields();
        self.last_scanned = Some(now);
        self.scan_status = Some(ScanStatus::Partial);
    }

    /// Record a failed scan attempt.
    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        self.clear_scan_fields();
        self.last_scanned = Some(now);
        self.scan_status = Some(ScanStatus::Failed);
    }

    fn clear_scan_fields(&mut self) {
        self.model = None;
        self.serial_number = None;
        self.collected_os_version = None;
        self.uptime = None;
        self.last_scanned = None;
        self.scan_status = None;
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device: {} ({}) - {} - {}",
            self.hostname, self.mgmt_ip, self.site, self.role
        )?;
        if let Some(os_type) = &self.os_type {
            write!(f, " - {os_type}")?;
        }
        if let Some(vendor) = &self.vendor {
            write!(f, " - {vendor}")?;
        }
        if let Some(os_version) = &self.os_version {
            write!(f, " - {os_version}")?;
        }

        match self.scan_status {
            None => write!(f, " | never scanned")?,
            Some(status) => {
                write!(f, " | last scan: {status}")?;
                if let Some(ts) = self.last_scanned {
                    write!(f, " at {}", ts.format("%Y-%m-%d %H:%M:%S"))?;
                }
                if let Some(model) = &self.model {
                    write!(f, ", model {model}")?;
                }
                if let Some(serial) = &self.serial_number {
                    write!(f, ", serial {serial}")?;
                }
                if let Some(version) = &self.collected_os_version {
                    write!(f, ", version {version}")?;
                }
                if let Some(uptime) = &self.uptime {
                    write!(f, ", up {uptime}")?;
                }
            }
        }
        Ok(())
    }
}
