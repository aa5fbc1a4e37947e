//! Service configuration.
//!
//! Precedence is CLI flag > environment variable > default. [`Config::new`]
//! applies the environment on top of the defaults; the `with_*` builders are
//! used by the binary for flags.

use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::db::ConnectOptions;

pub const ENV_STORAGE_TYPE: &str = "MEND_STORAGE_TYPE";
pub const ENV_STORAGE_ADDR: &str = "MEND_STORAGE_ADDR";
pub const ENV_STORAGE_USER: &str = "MEND_STORAGE_USER";
pub const ENV_STORAGE_PASSWORD: &str = "MEND_STORAGE_PASSWORD";
pub const ENV_HOST: &str = "MEND_HOST";
pub const ENV_PORT: &str = "MEND_PORT";
pub const ENV_TIMEOUT_SECS: &str = "MEND_TIMEOUT_SECS";

const DEFAULT_STORAGE_TYPE: &str = "sqlite";
const DEFAULT_STORAGE_ADDR: &str = "./db.sqlite";
const DEFAULT_HOST: IpAddr = IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8443;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where and how to reach the storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Backend name, parsed into a [`StorageKind`](crate::db::StorageKind) on open
    pub kind: String,
    /// File path, `sqlite:` URL, `:memory:`, or a SurrealDB endpoint
    pub addr: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: DEFAULT_STORAGE_TYPE.to_string(),
            addr: DEFAULT_STORAGE_ADDR.to_string(),
            username: None,
            password: None,
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage: StorageConfig,
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Per-operation storage deadline
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Defaults overridden by any `MEND_*` environment variables that are set.
    pub fn new() -> Self {
        let mut config = Self::default();

        if let Ok(kind) = env::var(ENV_STORAGE_TYPE) {
            config.storage.kind = kind;
        }
        if let Ok(addr) = env::var(ENV_STORAGE_ADDR) {
            config.storage.addr = addr;
        }
        config.storage.username = env::var(ENV_STORAGE_USER).ok();
        config.storage.password = env::var(ENV_STORAGE_PASSWORD).ok();

        if let Some(host) = parsed_env(ENV_HOST) {
            config.host = host;
        }
        if let Some(port) = parsed_env(ENV_PORT) {
            config.port = port;
        }
        if let Some(secs) = parsed_env::<u64>(ENV_TIMEOUT_SECS) {
            config.timeout = Duration::from_secs(secs);
        }

        config
    }

    pub fn with_storage_kind(mut self, kind: impl Into<String>) -> Self {
        self.storage.kind = kind.into();
        self
    }

    pub fn with_storage_addr(mut self, addr: impl Into<String>) -> Self {
        self.storage.addr = addr.into();
        self
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `host:port` as handed to the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Adapter options derived from this configuration.
    pub fn connect_options(&self) -> ConnectOptions {
        let options = ConnectOptions::default().with_timeout(self.timeout);
        match (&self.storage.username, &self.storage.password) {
            (Some(user), Some(pass)) => options.with_credentials(user.clone(), pass.clone()),
            _ => options,
        }
    }
}

fn parsed_env<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable environment variable");
            None
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
