//! Error types for netinvent.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for netinvent operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Inventory configuration errors (fatal, abort before scanning)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Snapshot persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Inventory file errors (missing or malformed device list).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Inventory file could not be read
    #[error("Failed to read inventory file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Inventory file is not valid YAML or is missing required fields
    #[error("Malformed inventory file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Hostnames must be unique within one inventory
    #[error("Duplicate hostname '{hostname}' in inventory")]
    DuplicateHostname { hostname: String },
}

/// Transport layer errors (SSH connection, authentication, prompt reads).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Connection attempt timed out
    #[error("Connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// Prompt was not seen within the read deadline
    #[error("Prompt not found within {0:?}")]
    PromptTimeout(Duration),

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Snapshot file errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Output directory could not be created
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Snapshot file could not be written
    #[error("Failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Snapshot could not be serialized
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias using netinvent's Error.
pub type Result<T> = std::result::Result<T, Error>;
