use crate::error::{RoteiroError, RoteiroResult};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_DATABASE: &str = "roteiro.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub database: PathBuf,
    /// Log every SQL statement at debug level.
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            database: PathBuf::from(DEFAULT_DATABASE),
            debug: false,
        }
    }
}

impl ServerConfig {
    /// Reads `ROTEIRO_BIND`, `ROTEIRO_DATABASE` and `ROTEIRO_DEBUG`.
    pub fn from_env() -> RoteiroResult<Self> {
        let mut cfg = Self::default();

        if let Ok(v) = env::var("ROTEIRO_BIND") {
            cfg.bind = v.parse().map_err(|e| {
                RoteiroError::config(format!("ROTEIRO_BIND '{}' is not a socket address: {}", v, e))
            })?;
        }

        if let Ok(v) = env::var("ROTEIRO_DATABASE") {
            if !v.trim().is_empty() {
                cfg.database = PathBuf::from(v);
            }
        }

        if let Ok(v) = env::var("ROTEIRO_DEBUG") {
            cfg.debug = parse_flag(&v);
        }

        Ok(cfg)
    }
}

pub fn parse_flag(v: &str) -> bool {
    matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
