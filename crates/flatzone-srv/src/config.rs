//! Server configuration for flatzone.
//!
//! Built once at startup (from a TOML file, CLI flags, or both) and never
//! changed while the server runs.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default path of the zone database.
pub const DEFAULT_DATABASE_FILE: &str = "database.yaml";

/// Static configuration for a flatzone server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// UDP/TCP listen address (default: 0.0.0.0:53).
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Do not serve over TCP.
    #[serde(default)]
    pub disable_tcp: bool,

    /// Do not serve over UDP.
    #[serde(default)]
    pub disable_udp: bool,

    /// Set the AA bit in responses.
    #[serde(default = "default_authoritative")]
    pub authoritative: bool,

    /// Path to the YAML zone database.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Upstream server used to flatten ANAME records (default: 1.1.1.1:53).
    #[serde(default = "default_upstream")]
    pub upstream: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            disable_tcp: false,
            disable_udp: false,
            authoritative: default_authoritative(),
            database: default_database(),
            upstream: default_upstream(),
        }
    }
}

impl ServerConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::SrvError::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Reject configurations that cannot serve anything.
    pub fn validate(&self) -> crate::Result<()> {
        if self.disable_tcp && self.disable_udp {
            return Err(crate::SrvError::Config(
                "both TCP and UDP are disabled".into(),
            ));
        }
        Ok(())
    }
}

// Default value functions for serde.
fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 53))
}

const fn default_authoritative() -> bool {
    true
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_FILE)
}

fn default_upstream() -> SocketAddr {
    SocketAddr::from(([1, 1, 1, 1], 53))
}
