//! Service configuration.
//!
//! Values are layered with figment: built-in defaults, then `config.toml` in
//! the working directory, then environment variables. Environment keys are
//! the upper-case field names (`PORT`, `WEBHOOK_SECRET`, ...).

use std::{
    fmt,
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Optional configuration file, resolved against the working directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Worker identifier reported by the health check unless overridden.
pub const DEFAULT_WORKER_NAME: &str = "talktech-contact-webhook";

/// Process-wide configuration.
///
/// A missing `WEBHOOK_SECRET` is not a load error. The service starts and
/// answers every `POST` with a configuration error until one is set.
///
/// # Example
///
/// ```no_run
/// use intake_api::Config;
///
/// let config = Config::load().expect("Failed to load configuration");
/// let addr = config.parse_server_addr().expect("Invalid address");
/// println!("listening on {addr}");
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite connection URL (`DATABASE_URL`).
    pub database_url: String,
    /// Pool size (`DATABASE_MAX_CONNECTIONS`).
    pub database_max_connections: u32,
    /// Seconds to wait for a pooled connection (`DATABASE_CONNECTION_TIMEOUT`).
    pub database_connection_timeout: u64,
    /// Bind address (`HOST`).
    pub host: String,
    /// Bind port (`PORT`).
    pub port: u16,
    /// Seconds before an in-flight request is abandoned (`REQUEST_TIMEOUT`).
    pub request_timeout: u64,
    /// Shared secret expected in `X-Signature` (`WEBHOOK_SECRET`).
    #[serde(skip_serializing)]
    pub webhook_secret: Option<String>,
    /// Name reported by the health check (`WORKER_NAME`).
    pub worker_name: String,
    /// Echo storage error text on failed writes (`EXPOSE_ERROR_DETAILS`).
    pub expose_error_details: bool,
    /// Base tracing filter (`RUST_LOG`).
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://intake.db?mode=rwc".to_string(),
            database_max_connections: 10,
            database_connection_timeout: 10,
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout: 30,
            webhook_secret: None,
            worker_name: DEFAULT_WORKER_NAME.to_string(),
            expose_error_details: true,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads and validates the layered configuration.
    ///
    /// # Errors
    ///
    /// Fails when a source holds a value of the wrong type or a value is out
    /// of range.
    pub fn load() -> Result<Self> {
        let config: Self = Self::figment().extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// The provider stack, lowest priority first.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""))
    }

    /// Settings the request handler consults.
    pub fn intake_settings(&self) -> IntakeSettings {
        IntakeSettings {
            webhook_secret: self.webhook_secret.clone().filter(|s| !s.is_empty()),
            worker_name: self.worker_name.clone(),
            expose_error_details: self.expose_error_details,
            request_timeout: Duration::from_secs(self.request_timeout),
        }
    }

    /// Socket address built from `host` and `port`.
    ///
    /// # Errors
    ///
    /// Fails when `host` is not an IP address.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr =
            self.host.parse().with_context(|| format!("Invalid HOST address: {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Whether a non-empty shared secret is configured.
    pub fn has_webhook_secret(&self) -> bool {
        self.webhook_secret.as_deref().is_some_and(|s| !s.is_empty())
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.port != 0, "PORT must be greater than 0");
        ensure!(self.database_max_connections != 0, "DATABASE_MAX_CONNECTIONS must be greater than 0");
        ensure!(self.request_timeout != 0, "REQUEST_TIMEOUT must be greater than 0");
        ensure!(!self.worker_name.trim().is_empty(), "WORKER_NAME must not be empty");
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("database_max_connections", &self.database_max_connections)
            .field("database_connection_timeout", &self.database_connection_timeout)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("request_timeout", &self.request_timeout)
            .field("webhook_secret", &redacted(self.webhook_secret.as_deref()))
            .field("worker_name", &self.worker_name)
            .field("expose_error_details", &self.expose_error_details)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

/// Settings consulted on every request.
#[derive(Clone)]
pub struct IntakeSettings {
    /// Shared secret for `X-Signature`. `None` means misconfigured.
    pub webhook_secret: Option<String>,
    /// Worker identifier reported by the health check.
    pub worker_name: String,
    /// Whether failed writes echo the storage error text.
    pub expose_error_details: bool,
    /// Upper bound on a single request.
    pub request_timeout: Duration,
}

impl IntakeSettings {
    /// Replaces the shared secret. An empty secret counts as unset.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into()).filter(|s| !s.is_empty());
        self
    }
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Config::default().intake_settings()
    }
}

impl fmt::Debug for IntakeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntakeSettings")
            .field("webhook_secret", &redacted(self.webhook_secret.as_deref()))
            .field("worker_name", &self.worker_name)
            .field("expose_error_details", &self.expose_error_details)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn redacted(secret: Option<&str>) -> Option<&'static str> {
    secret.map(|_| "***")
}
