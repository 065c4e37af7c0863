//! Configuration module for Huddle.

use serde::Deserialize;
use std::path::Path;

use crate::chat::WireCodec;
use crate::{HuddleError, Result};

/// Hub server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on. Also the default offered by the port prompt.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Envelopes queued per connection before a recipient counts as failed.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_outbound_buffer() -> usize {
    256
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

/// Chat wire configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatConfig {
    /// Payload codec. Hub and terminal peers must agree.
    #[serde(default)]
    pub codec: WireCodec,
}

/// Terminal peer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Render colour markers with ANSI escapes.
    #[serde(default = "default_true")]
    pub color: bool,
    /// Clear the terminal on start.
    #[serde(default = "default_true")]
    pub clear_screen: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            color: true,
            clear_screen: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Logs go to stderr when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Hub server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Chat wire configuration.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Terminal peer configuration.
    #[serde(default)]
    pub client: ClientConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(HuddleError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| HuddleError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `HUDDLE_CODEC`: `plain` or `obscured`
    /// - `HUDDLE_PORT`: hub port
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(codec) = std::env::var("HUDDLE_CODEC") {
            if !codec.is_empty() {
                self.chat.codec = codec.parse()?;
            }
        }
        if let Ok(port) = std::env::var("HUDDLE_PORT") {
            if !port.is_empty() {
                self.server.port = port
                    .parse()
                    .map_err(|_| HuddleError::Config(format!("HUDDLE_PORT is not a port: {port}")))?;
            }
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(HuddleError::Config(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.server.outbound_buffer == 0 {
            return Err(HuddleError::Config(
                "server.outbound_buffer must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
