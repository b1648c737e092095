//! Remote shell sessions.
//!
//! A session owns exactly one transport to one device at a time and is
//! never reused across devices. Connection failures are classified and
//! stored rather than propagated: `connect` returns a bool and callers
//! consult `status`/`error` afterwards, so one unreachable device can be
//! recorded and the batch can move on.

mod buffer;
pub mod dialect;
mod transport;

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

pub use dialect::Dialect;
pub use transport::SshTransport;

use crate::error::TransportError;
use crate::inventory::Credentials;

/// Sentinel returned by `send_command` when no session is established.
pub const NOT_CONNECTED: &str = "Not connected to the device";

/// Outcome of the most recent connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Success,
    Failed,
}

/// Everything needed to open a session to one device.
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub credentials: Credentials,
    pub dialect: &'static Dialect,
    pub timeout: Duration,
}

/// A remote shell session to one device.
///
/// This is the seam between the scanner and the SSH stack; tests drive
/// the scanner with scripted implementations.
#[async_trait]
pub trait Session: Send {
    /// Establish the session. Idempotent: calling while connected is a
    /// no-op reporting success. Never returns an error - consult
    /// [`Session::status`] and [`Session::error`] after a `false`.
    async fn connect(&mut self) -> bool;

    /// Send a command and return its raw output. With no established
    /// session, returns the [`NOT_CONNECTED`] sentinel instead.
    async fn send_command(&mut self, command: &str) -> String;

    /// Release the transport. Idempotent no-op when not connected; a later
    /// `connect` may recreate the session.
    async fn disconnect(&mut self);

    /// Status of the last connection attempt, unset before any attempt.
    fn status(&self) -> Option<SessionStatus>;

    /// Error message from the last failed attempt.
    fn error(&self) -> Option<&str>;
}

/// Creates sessions for the scanner; the seam tests replace.
pub trait SessionFactory: Send + Sync {
    type Session: Session;

    fn open_session(&self, config: SessionConfig) -> Self::Session;
}

/// Factory producing real SSH sessions.
#[derive(Debug, Default)]
pub struct SshSessionFactory;

impl SessionFactory for SshSessionFactory {
    type Session = DeviceSession;

    fn open_session(&self, config: SessionConfig) -> DeviceSession {
        DeviceSession::new(config)
    }
}

/// SSH-backed session implementation.
pub struct DeviceSession {
    config: SessionConfig,
    transport: Option<SshTransport>,
    status: Option<SessionStatus>,
    error: Option<String>,
}

impl DeviceSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            transport: None,
            status: None,
            error: None,
        }
    }

    /// Wait for the login prompt, then push the dialect's setup commands
    /// (paging off) so scan output arrives in one piece.
    async fn prepare(&self, transport: &mut SshTransport) -> Result<(), TransportError> {
        let dialect = self.config.dialect;
        transport
            .read_until_prompt(&dialect.prompt, self.config.timeout)
            .await?;
        for command in dialect.setup_commands {
            transport.send(command).await?;
            transport
                .read_until_prompt(&dialect.prompt, self.config.timeout)
                .await?;
        }
        Ok(())
    }

    fn record_failure(&mut self, error: TransportError) {
        let host = &self.config.host;
        match &error {
            TransportError::ConnectTimeout(_) => {
                warn!("connection to {host} timed out: {error}");
            }
            TransportError::AuthenticationFailed { .. } => {
                warn!("authentication to {host} failed: {error}");
            }
            _ => warn!("connection to {host} failed: {error}"),
        }
        self.status = Some(SessionStatus::Failed);
        self.error = Some(error.to_string());
    }
}

#[async_trait]
impl Session for DeviceSession {
    async fn connect(&mut self) -> bool {
        if self.transport.is_some() {
            debug!("already connected to {}", self.config.host);
            self.status = Some(SessionStatus::Success);
            return true;
        }

        let mut transport = match SshTransport::connect(&self.config).await {
            Ok(transport) => transport,
            Err(error) => {
                self.record_failure(error);
                return false;
            }
        };

        if let Err(error) = self.prepare(&mut transport).await {
            self.record_failure(error);
            if let Err(close_error) = transport.close().await {
                debug!("error closing half-open session: {close_error}");
            }
            return false;
        }

        info!("connected to {}", self.config.host);
        self.transport = Some(transport);
        self.status = Some(SessionStatus::Success);
        self.error = None;
        true
    }

    async fn send_command(&mut self, command: &str) -> String {
        let timeout = self.config.timeout;
        let prompt = &self.config.dialect.prompt;

        let Some(transport) = self.transport.as_mut() else {
            return NOT_CONNECTED.to_string();
        };

        if let Err(error) = transport.send(command).await {
            let message = error.to_string();
            self.record_failure(error);
            debug!("send of '{command}' failed: {message}");
            return String::new();
        }

        match transport.read_until_prompt(prompt, timeout).await {
            Ok(data) => normalize_output(&String::from_utf8_lossy(&data), command),
            Err(error) => {
                // Return what was read; the parser decides whether it is
                // usable.
                let salvaged = transport.take_buffered();
                self.record_failure(error);
                normalize_output(&String::from_utf8_lossy(&salvaged), command)
            }
        }
    }

    async fn disconnect(&mut self) {
        if let Some(transport) = self.transport.take() {
            if let Err(error) = transport.close().await {
                warn!("error disconnecting from {}: {error}", self.config.host);
            }
            debug!("disconnected from {}", self.config.host);
        }
    }

    fn status(&self) -> Option<SessionStatus> {
        self.status
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Strip the command echo from the front and the prompt line from the end
/// of raw shell output.
fn normalize_output(raw: &str, command: &str) -> String {
    let output = raw
        .strip_prefix(command)
        .unwrap_or(raw)
        .trim_start_matches(['\r', '\n']);

    match output.rfind('\n') {
        Some(pos) => output[..pos].to_string(),
        None => output.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_echo_and_prompt() {
        let raw = "show version\r\nCisco IOS Software, Version 15.2(7)E10,\r\nSW1#";
        let normalized = normalize_output(raw, "show version");
        assert_eq!(normalized, "Cisco IOS Software, Version 15.2(7)E10,\r");
    }

    #[test]
    fn normalize_without_echo_keeps_output() {
        let raw = "some output\nSW1#";
        assert_eq!(normalize_output(raw, "show version"), "some output");
    }
}
