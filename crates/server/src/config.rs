//! Server configuration, read from a TOML file.
//!
//! ```toml
//! host = "0.0.0.0"
//! http_port = 8080
//! rpc_port = 3000
//! ephemeris = "data/track.json"
//!
//! [engine]
//! default_radius = 500.0
//! duration_policy = "contiguous"
//!
//! [broadcast]
//! channel = "position"
//! interval_secs = 5
//! ```

use anyhow::{Context, Result};
use overpass::EngineConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_http_port")]
    pub http_port: u16,

    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// JSON track loaded into the ephemeris at startup.
    #[serde(default)]
    pub ephemeris: Option<PathBuf>,

    /// Accept queries starting before the current UTC day.
    #[serde(default)]
    pub allow_history: bool,

    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    #[serde(default)]
    pub broadcast: Option<BroadcastConfig>,

    #[serde(default)]
    pub engine: EngineConfig,
}

/// Periodic publication of the current position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BroadcastConfig {
    pub channel: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl BroadcastConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_http_port() -> u16 {
    8080
}

const fn default_rpc_port() -> u16 {
    3000
}

const fn default_channel_capacity() -> usize {
    crate::channels::DEFAULT_CAPACITY
}

const fn default_interval_secs() -> u64 {
    1
}

impl ServerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate().map_err(anyhow::Error::msg)?;
        if self.channel_capacity == 0 {
            anyhow::bail!("channel_capacity must be positive");
        }
        if let Some(broadcast) = &self.broadcast {
            if broadcast.interval_secs == 0 {
                anyhow::bail!("broadcast.interval_secs must be positive");
            }
            if broadcast.channel.is_empty() {
                anyhow::bail!("broadcast.channel must not be empty");
            }
        }
        Ok(())
    }

    pub fn http_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.http_port).parse()?)
    }

    pub fn rpc_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.rpc_port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            rpc_port: default_rpc_port(),
            ephemeris: None,
            allow_history: false,
            channel_capacity: default_channel_capacity(),
            broadcast: None,
            engine: EngineConfig::default(),
        }
    }
}
