//! Application configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use serde::Deserialize;

/// Browser identification presented on outbound fetches. Some origins reject
/// requests carrying a default HTTP client identifier.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address to bind the HTTP server on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    // === Preview ===
    /// Maximum number of data rows in a preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    // === Outbound Fetch ===
    /// Total timeout for one fetch, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Connect timeout for one fetch, in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Upper bound on a fetched body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// User-Agent header sent with every fetch.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

const VERBOSE_DIRECTIVE: &str = "csv_preview=debug,info";

fn default_port() -> u16 {
    8000
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_preview_rows() -> usize {
    5
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_connect_timeout_ms() -> u64 {
    3_000
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_addr: default_bind_addr(),
            preview_rows: default_preview_rows(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            max_body_bytes: default_max_body_bytes(),
            user_agent: default_user_agent(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.preview_rows == 0 {
            return Err("PREVIEW_ROWS must be at least 1".to_string());
        }

        if self.fetch_timeout_ms == 0 {
            return Err("FETCH_TIMEOUT_MS must be greater than 0".to_string());
        }

        if self.connect_timeout_ms == 0 {
            return Err("CONNECT_TIMEOUT_MS must be greater than 0".to_string());
        }

        if self.max_body_bytes == 0 {
            return Err("MAX_BODY_BYTES must be greater than 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("USER_AGENT must not be empty".to_string());
        }

        self.socket_addr()?;

        Ok(())
    }

    /// Socket address the server listens on.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .bind_addr
            .parse()
            .map_err(|e| format!("BIND_ADDR `{}` is not an IP address: {}", self.bind_addr, e))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Total fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Connect timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Tracing filter directive. Verbose mode (from `VERBOSE` or the CLI flag)
    /// overrides `RUST_LOG`.
    pub fn log_directive(&self, verbose_flag: bool) -> String {
        if verbose_flag || self.verbose {
            VERBOSE_DIRECTIVE.to_string()
        } else {
            self.rust_log.clone()
        }
    }
}
