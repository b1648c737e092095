//! Scan orchestration.
//!
//! One scan resolves credentials, opens a session, issues `show version`
//! and `show inventory`, feeds the version text to the parser and folds
//! the result into the [`Device`] record. Each attempt is terminal in one
//! call: pending -> connecting -> success | partial | failed, no retry at
//! this layer.

use std::time::Duration;

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use log::{info, warn};

use crate::inventory::{Device, credentials};
use crate::parser::{VersionInfo, parse_show_version};
use crate::session::{
    Session, SessionConfig, SessionFactory, SessionStatus, SshSessionFactory, dialect,
};

/// Result of one scan attempt. Transient: the caller extracts what it
/// needs and discards it; the durable state lives on the [`Device`].
#[derive(Debug)]
pub enum ScanOutcome {
    /// Connected and version output parsed.
    Success {
        fields: VersionInfo,
        /// Raw "show inventory" output, retrieved but not parsed.
        inventory: String,
    },
    /// Connected, but the version output was not recognizable.
    Partial {
        version_output: String,
        inventory: String,
    },
    /// Session could not be established, or the scan timed out.
    Failed {
        status: SessionStatus,
        error: String,
    },
}

impl ScanOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ScanOutcome::Success { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ScanOutcome::Failed { .. })
    }
}

/// Scans devices through sessions produced by a [`SessionFactory`].
pub struct Scanner<F = SshSessionFactory> {
    factory: F,
    /// Time allowed for one whole device scan, connect through disconnect.
    device_timeout: Duration,
    /// How many devices are scanned at once. 1 means strictly sequential.
    concurrency: usize,
}

impl Scanner<SshSessionFactory> {
    pub fn new() -> Self {
        Self::with_factory(SshSessionFactory)
    }
}

impl Default for Scanner<SshSessionFactory> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: SessionFactory> Scanner<F> {
    pub fn with_factory(factory: F) -> Self {
        Self {
            factory,
            device_timeout: Duration::from_secs(60),
            concurrency: 1,
        }
    }

    /// Set the per-device scan timeout.
    pub fn device_timeout(mut self, timeout: Duration) -> Self {
        self.device_timeout = timeout;
        self
    }

    /// Set how many devices are scanned concurrently.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Scan one device, stamping its record with the result.
    ///
    /// The whole attempt runs under the per-device timeout so one hung
    /// device cannot stall a batch indefinitely.
    pub async fn scan_device(&self, device: &mut Device) -> ScanOutcome {
        match tokio::time::timeout(self.device_timeout, self.scan_inner(device)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    "scan of {} timed out after {:?}",
                    device.hostname, self.device_timeout
                );
                device.record_failure(Utc::now());
                ScanOutcome::Failed {
                    status: SessionStatus::Failed,
                    error: format!("scan timed out after {:?}", self.device_timeout),
                }
            }
        }
    }

    async fn scan_inner(&self, device: &mut Device) -> ScanOutcome {
        let Some(dialect) = device.os_type.as_deref().and_then(dialect::lookup) else {
            warn!(
                "device {} has no usable os_type ({:?}), not connecting",
                device.hostname, device.os_type
            );
            device.record_failure(Utc::now());
            return ScanOutcome::Failed {
                status: SessionStatus::Failed,
                error: format!("no session dialect for os_type {:?}", device.os_type),
            };
        };

        let credentials = credentials::resolve(&*device);
        let config = SessionConfig {
            host: device.mgmt_ip.clone(),
            port: 22,
            credentials,
            dialect,
            timeout: self.device_timeout,
        };

        let mut session = self.factory.open_session(config);
        if !session.connect().await {
            let error = session
                .error()
                .unwrap_or("connection failed")
                .to_string();
            warn!("can't connect to device {}: {error}", device.hostname);
            device.record_failure(Utc::now());
            return ScanOutcome::Failed {
                status: session.status().unwrap_or(SessionStatus::Failed),
                error,
            };
        }

        let version_output = session.send_command("show version").await;
        let inventory_output = session.send_command("show inventory").await;
        session.disconnect().await;

        let now = Utc::now();
        match parse_show_version(&version_output) {
            Some(fields) => {
                info!(
                    "scanned {}: model {:?}, serial {:?}, version {}",
                    device.hostname, fields.model, fields.serial_number, fields.os_version
                );
                device.record_success(&fields, now);
                ScanOutcome::Success {
                    fields,
                    inventory: inventory_output,
                }
            }
            None => {
                warn!(
                    "unrecognized version output from {}, marking partial",
                    device.hostname
                );
                device.record_partial(now);
                ScanOutcome::Partial {
                    version_output,
                    inventory: inventory_output,
                }
            }
        }
    }

    /// Scan every device, returning one outcome per device in input order.
    ///
    /// Individual failures never abort the batch. Devices are scanned
    /// `concurrency` at a time; each device's session and record stay
    /// confined to its own task.
    pub async fn scan_all(&self, devices: &mut [Device]) -> Vec<ScanOutcome> {
        stream::iter(devices.iter_mut())
            .map(|device| self.scan_device(device))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::inventory::ScanStatus;
    use crate::session::NOT_CONNECTED;

    const SHOW_VERSION: &str = "\
Cisco IOS Software, C2960X Software, Version 15.2(7)E3, RELEASE SOFTWARE (fc4)

LAB-SW-001 uptime is 3 days, 2 hours
Model number                    : WS-C2960X-24TS-L
System serial number            : FCW2222A1BC
";

    #[derive(Clone)]
    enum Script {
        ConnectFail(&'static str),
        Respond {
            version: &'static str,
            inventory: &'static str,
        },
        Hang,
    }

    struct MockSession {
        script: Script,
        connected: bool,
        status: Option<SessionStatus>,
        error: Option<String>,
    }

    #[async_trait]
    impl Session for MockSession {
        async fn connect(&mut self) -> bool {
            match &self.script {
                Script::ConnectFail(message) => {
                    self.status = Some(SessionStatus::Failed);
                    self.error = Some((*message).to_string());
                    false
                }
                Script::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    false
                }
                Script::Respond { .. } => {
                    self.connected = true;
                    self.status = Some(SessionStatus::Success);
                    true
                }
            }
        }

        async fn send_command(&mut self, command: &str) -> String {
            if !self.connected {
                return NOT_CONNECTED.to_string();
            }
            match (&self.script, command) {
                (Script::Respond { version, .. }, "show version") => (*version).to_string(),
                (Script::Respond { inventory, .. }, "show inventory") => (*inventory).to_string(),
                _ => String::new(),
            }
        }

        async fn disconnect(&mut self) {
            self.connected = false;
        }

        fn status(&self) -> Option<SessionStatus> {
            self.status
        }

        fn error(&self) -> Option<&str> {
            self.error.as_deref()
        }
    }

    /// Scripts sessions by target host address.
    struct MockFactory {
        scripts: HashMap<&'static str, Script>,
    }

    impl MockFactory {
        fn new(scripts: impl IntoIterator<Item = (&'static str, Script)>) -> Self {
            Self {
                scripts: scripts.into_iter().collect(),
            }
        }
    }

    impl SessionFactory for MockFactory {
        type Session = MockSession;

        fn open_session(&self, config: SessionConfig) -> MockSession {
            let script = self
                .scripts
                .get(config.host.as_str())
                .cloned()
                .expect("unscripted host");
            MockSession {
                script,
                connected: false,
                status: None,
                error: None,
            }
        }
    }

    fn device(hostname: &str, ip: &str) -> Device {
        Device::new(hostname, ip, "LAB", "access", Some("cisco_ios".into()))
    }

    fn respond_ok() -> Script {
        Script::Respond {
            version: SHOW_VERSION,
            inventory: "NAME: \"1\", DESCR: \"WS-C2960X-24TS-L\"",
        }
    }

    #[tokio::test]
    async fn successful_scan_copies_parsed_fields() {
        let factory = MockFactory::new([("10.0.0.1", respond_ok())]);
        let scanner = Scanner::with_factory(factory);
        let mut dev = device("LAB-SW-001", "10.0.0.1");

        let outcome = scanner.scan_device(&mut dev).await;

        assert!(outcome.is_success());
        assert_eq!(dev.scan_status, Some(ScanStatus::Success));
        assert_eq!(dev.model.as_deref(), Some("WS-C2960X-24TS-L"));
        assert_eq!(dev.serial_number.as_deref(), Some("FCW2222A1BC"));
        assert_eq!(dev.collected_os_version.as_deref(), Some("15.2(7)E3"));
        assert_eq!(dev.uptime.as_deref(), Some("3 days, 2 hours"));
        assert!(dev.last_scanned.is_some());
    }

    #[tokio::test]
    async fn unrecognized_output_marks_partial_without_fields() {
        let factory = MockFactory::new([(
            "10.0.0.1",
            Script::Respond {
                version: "Invalid command",
                inventory: "also garbage",
            },
        )]);
        let scanner = Scanner::with_factory(factory);
        let mut dev = device("LAB-SW-001", "10.0.0.1");

        let outcome = scanner.scan_device(&mut dev).await;

        match outcome {
            ScanOutcome::Partial {
                version_output,
                inventory,
            } => {
                assert_eq!(version_output, "Invalid command");
                assert_eq!(inventory, "also garbage");
            }
            other => panic!("expected partial outcome, got {other:?}"),
        }
        assert_eq!(dev.scan_status, Some(ScanStatus::Partial));
        assert_eq!(dev.model, None);
        assert!(dev.last_scanned.is_some());
    }

    #[tokio::test]
    async fn connect_failure_sends_no_commands() {
        let factory = MockFactory::new([("10.0.0.1", Script::ConnectFail("timed out"))]);
        let scanner = Scanner::with_factory(factory);
        let mut dev = device("LAB-SW-001", "10.0.0.1");

        let outcome = scanner.scan_device(&mut dev).await;

        match outcome {
            ScanOutcome::Failed { status, error } => {
                assert_eq!(status, SessionStatus::Failed);
                assert_eq!(error, "timed out");
            }
            other => panic!("expected failed outcome, got {other:?}"),
        }
        assert_eq!(dev.scan_status, Some(ScanStatus::Failed));
        assert!(dev.last_scanned.is_some());
    }

    #[tokio::test]
    async fn missing_os_type_fails_before_connecting() {
        let factory = MockFactory::new([]);
        let scanner = Scanner::with_factory(factory);
        let mut dev = Device::new("LAB-SW-001", "10.0.0.1", "LAB", "access", None);

        let outcome = scanner.scan_device(&mut dev).await;

        assert!(outcome.is_failed());
        assert_eq!(dev.scan_status, Some(ScanStatus::Failed));
    }

    #[tokio::test]
    async fn batch_preserves_order_and_isolates_failures() {
        let factory = MockFactory::new([
            ("10.0.0.1", respond_ok()),
            ("10.0.0.2", Script::ConnectFail("no route to host")),
            ("10.0.0.3", respond_ok()),
        ]);
        let scanner = Scanner::with_factory(factory);
        let mut devices = vec![
            device("SW1", "10.0.0.1"),
            device("SW2", "10.0.0.2"),
            device("SW3", "10.0.0.3"),
        ];

        let outcomes = scanner.scan_all(&mut devices).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_success());
        assert!(outcomes[1].is_failed());
        assert!(outcomes[2].is_success());
        assert_eq!(devices[0].scan_status, Some(ScanStatus::Success));
        assert_eq!(devices[1].scan_status, Some(ScanStatus::Failed));
        assert_eq!(devices[2].scan_status, Some(ScanStatus::Success));
    }

    #[tokio::test]
    async fn batch_order_is_kept_with_concurrency() {
        let factory = MockFactory::new([
            ("10.0.0.1", respond_ok()),
            ("10.0.0.2", Script::ConnectFail("refused")),
            ("10.0.0.3", respond_ok()),
            ("10.0.0.4", respond_ok()),
        ]);
        let scanner = Scanner::with_factory(factory).concurrency(4);
        let mut devices = vec![
            device("SW1", "10.0.0.1"),
            device("SW2", "10.0.0.2"),
            device("SW3", "10.0.0.3"),
            device("SW4", "10.0.0.4"),
        ];

        let outcomes = scanner.scan_all(&mut devices).await;

        assert_eq!(outcomes.len(), 4);
        assert!(outcomes[1].is_failed());
        for i in [0, 2, 3] {
            assert!(outcomes[i].is_success(), "device {i} should have succeeded");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hung_device_hits_the_scan_timeout() {
        let factory = MockFactory::new([
            ("10.0.0.1", Script::Hang),
            ("10.0.0.2", respond_ok()),
        ]);
        let scanner = Scanner::with_factory(factory).device_timeout(Duration::from_secs(30));
        let mut devices = vec![device("SW1", "10.0.0.1"), device("SW2", "10.0.0.2")];

        let outcomes = scanner.scan_all(&mut devices).await;

        match &outcomes[0] {
            ScanOutcome::Failed { error, .. } => assert!(error.contains("timed out")),
            other => panic!("expected timeout failure, got {other:?}"),
        }
        assert_eq!(devices[0].scan_status, Some(ScanStatus::Failed));
        assert!(outcomes[1].is_success());
    }

    #[tokio::test]
    async fn rescan_overwrites_previous_result_entirely() {
        let ok_factory = MockFactory::new([("10.0.0.1", respond_ok())]);
        let scanner = Scanner::with_factory(ok_factory);
        let mut dev = device("SW1", "10.0.0.1");
        scanner.scan_device(&mut dev).await;
        assert_eq!(dev.scan_status, Some(ScanStatus::Success));
        assert!(dev.model.is_some());

        let garbage_factory = MockFactory::new([(
            "10.0.0.1",
            Script::Respond {
                version: "Invalid command",
                inventory: "",
            },
        )]);
        let scanner = Scanner::with_factory(garbage_factory);
        scanner.scan_device(&mut dev).await;

        assert_eq!(dev.scan_status, Some(ScanStatus::Partial));
        assert_eq!(dev.model, None);
        assert_eq!(dev.serial_number, None);
        assert_eq!(dev.collected_os_version, None);
        assert_eq!(dev.uptime, None);
    }
}
