use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use dotenvy::Error as DotenvError;
use thiserror::Error;

use octoproxy_upstream::{DEFAULT_REQUEST_TIMEOUT, Url};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPSTREAM_URL: &str = "https://api.github.com";
const PORT_ENV: &str = "PORT";
const ADDR_ENV: &str = "OCTOPROXY_ADDR";
const UPSTREAM_ENV: &str = "OCTOPROXY_UPSTREAM";
const TIMEOUT_ENV: &str = "OCTOPROXY_TIMEOUT_SECS";

/// Configuration consumed by the service before spinning up Axum.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub upstream_url: Url,
    pub request_timeout: Duration,
}

impl ServerConfig {
    /// Loads configuration from the process environment.
    ///
    /// Values from a local `.env` file (parsed via [`dotenvy::dotenv_override`]) override whatever
    /// is already set in the process environment, which makes local development workflows
    /// predictable. A malformed `PORT` or `OCTOPROXY_TIMEOUT_SECS` falls back to the default;
    /// a malformed `OCTOPROXY_UPSTREAM` is a hard error.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_env_overrides()?;

        let port = resolve_port();

        let addr = env::var(ADDR_ENV)
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let bind_addr = SocketAddr::new(addr, port);

        let upstream_url = match env::var(UPSTREAM_ENV) {
            Ok(value) => value
                .parse::<Url>()
                .map_err(|_| ConfigError::InvalidUpstreamUrl(value))?,
            Err(_) => default_upstream_url(),
        };

        let request_timeout = env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Ok(Self {
            bind_addr,
            upstream_url,
            request_timeout,
        })
    }

    /// Returns a builder for programmatic overrides.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

impl Default for ServerConfig {
    /// Binds to `0.0.0.0:3000` and targets the public GitHub API root.
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            upstream_url: default_upstream_url(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Builder type for [`ServerConfig`].
#[derive(Default, Clone, Debug)]
pub struct ServerConfigBuilder {
    bind_addr: Option<SocketAddr>,
    upstream_url: Option<Url>,
    request_timeout: Option<Duration>,
}

impl ServerConfigBuilder {
    /// Sets the address for the embedded Axum listener.
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = Some(addr);
        self
    }

    /// Sets the upstream API base URL.
    pub fn upstream_url(mut self, url: Url) -> Self {
        self.upstream_url = Some(url);
        self
    }

    /// Sets the per-request deadline for outbound calls.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the final configuration.
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            bind_addr: self
                .bind_addr
                .unwrap_or_else(|| SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT)),
            upstream_url: self.upstream_url.unwrap_or_else(default_upstream_url),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

/// Errors that can occur while building [`ServerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid upstream url: {0}")]
    InvalidUpstreamUrl(String),
    #[error("failed to load .env overrides: {0}")]
    Dotenv(#[from] DotenvError),
}

fn load_env_overrides() -> Result<(), ConfigError> {
    match dotenvy::dotenv_override() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::Dotenv(err)),
    }
}

fn resolve_port() -> u16 {
    env::var(PORT_ENV)
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

fn default_upstream_url() -> Url {
    // The default is a compile-time constant and always parses.
    DEFAULT_UPSTREAM_URL.parse().expect("default upstream url")
}
