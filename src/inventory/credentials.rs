//! Credential resolution from environment variables.
//!
//! A device may name its own username/password variables in the inventory
//! file; otherwise the defaults apply. An unset variable is a warning,
//! not an error - the scan proceeds with the credential absent and
//! authentication fails downstream instead of being pre-empted here.

use std::env;

use log::warn;
use secrecy::SecretString;

use super::device::Device;

/// Default environment variable holding the username.
pub const DEFAULT_USERNAME_ENV: &str = "NETINVENT_USERNAME";

/// Default environment variable holding the password.
pub const DEFAULT_PASSWORD_ENV: &str = "NETINVENT_PASSWORD";

/// Resolved credentials for one device. Either side may be absent.
#[derive(Clone)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

/// What credential resolution needs to know about a device.
pub trait CredentialSource {
    fn hostname(&self) -> &str;
    fn username_env(&self) -> Option<&str>;
    fn password_env(&self) -> Option<&str>;
}

impl CredentialSource for Device {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn username_env(&self) -> Option<&str> {
        self.username_env.as_deref()
    }

    fn password_env(&self) -> Option<&str> {
        self.password_env.as_deref()
    }
}

/// Resolve the username and password for a device.
pub fn resolve(source: &impl CredentialSource) -> Credentials {
    let username = lookup(source.hostname(), source.username_env(), DEFAULT_USERNAME_ENV);
    let password = lookup(source.hostname(), source.password_env(), DEFAULT_PASSWORD_ENV)
        .map(SecretString::from);
    Credentials { username, password }
}

fn lookup(hostname: &str, custom: Option<&str>, default: &str) -> Option<String> {
    let var = custom.unwrap_or(default);
    match env::var(var) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("credential variable {var} is not set for device {hostname}");
            None
        }
    }
}
