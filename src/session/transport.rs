//! SSH transport wrapping russh.
//!
//! One transport owns one authenticated session with one open shell
//! channel. The session layer above it classifies errors into a scan
//! status; nothing here retries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use regex::bytes::Regex;
use russh::client::{self, Handle, Msg};
use russh::keys::PublicKey;
use russh::{Channel, ChannelMsg, Disconnect};
use secrecy::ExposeSecret;

use super::SessionConfig;
use super::buffer::PromptBuffer;
use crate::error::TransportError;

/// SSH transport with an interactive shell channel.
pub struct SshTransport {
    session: Handle<ClientHandler>,
    channel: Channel<Msg>,
    buffer: PromptBuffer,
}

impl SshTransport {
    /// Connect, authenticate with password, and open a PTY shell channel.
    pub async fn connect(config: &SessionConfig) -> Result<Self, TransportError> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.timeout),
            ..Default::default()
        });

        let mut session = tokio::time::timeout(
            config.timeout,
            client::connect(
                ssh_config,
                (config.host.as_str(), config.port),
                ClientHandler,
            ),
        )
        .await
        .map_err(|_| TransportError::ConnectTimeout(config.timeout))?
        .map_err(TransportError::Ssh)?;

        Self::authenticate(&mut session, config).await?;

        let channel = Self::open_shell(&session).await?;

        Ok(Self {
            session,
            channel,
            buffer: PromptBuffer::default(),
        })
    }

    /// Authenticate with the resolved credentials. Absent credentials are
    /// sent as empty strings so the device rejects them itself.
    async fn authenticate(
        session: &mut Handle<ClientHandler>,
        config: &SessionConfig,
    ) -> Result<(), TransportError> {
        let username = config.credentials.username.as_deref().unwrap_or_default();
        let password = config
            .credentials
            .password
            .as_ref()
            .map(|p| p.expose_secret())
            .unwrap_or_default();

        let success = session
            .authenticate_password(username, password)
            .await
            .map_err(TransportError::Ssh)?
            .success();

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: username.to_string(),
            });
        }

        Ok(())
    }

    async fn open_shell(session: &Handle<ClientHandler>) -> Result<Channel<Msg>, TransportError> {
        let channel = session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_pty(true, "xterm", 511, 24, 0, 0, &[])
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_shell(true)
            .await
            .map_err(TransportError::Ssh)?;

        Ok(channel)
    }

    /// Send one command line (newline appended).
    pub async fn send(&mut self, line: &str) -> Result<(), TransportError> {
        let data = format!("{line}\n");
        self.channel
            .data(data.as_bytes())
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }

    /// Read channel output until the prompt pattern appears in the buffer
    /// tail, then return everything accumulated.
    pub async fn read_until_prompt(
        &mut self,
        prompt: &Regex,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let deadline = Instant::now() + timeout;

        loop {
            if self.buffer.tail_matches(prompt) {
                return Ok(self.buffer.take());
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(TransportError::PromptTimeout(timeout));
            }

            let msg = tokio::time::timeout(remaining, self.channel.wait())
                .await
                .map_err(|_| TransportError::PromptTimeout(timeout))?;

            match msg {
                Some(ChannelMsg::Data { data }) => self.buffer.extend(&data),
                Some(ChannelMsg::ExtendedData { data, .. }) => self.buffer.extend(&data),
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(TransportError::Disconnected);
                }
                Some(_) => {}
            }
        }
    }

    /// Take whatever has been buffered so far, e.g. after a failed read.
    pub fn take_buffered(&mut self) -> Vec<u8> {
        self.buffer.take()
    }

    /// Close the connection.
    pub async fn close(self) -> Result<(), TransportError> {
        self.session
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

/// russh client handler. Host keys are accepted without verification;
/// scans target managed devices reached over the management network.
struct ClientHandler;

impl client::Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}
