//! Configuration loaded from environment variables

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub similar_limit: usize,
    pub session_idle_timeout: Duration,
    pub max_sessions: usize,
}

impl Config {
    /// Read from the process environment (call `dotenvy::dotenv()` first)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read through an arbitrary lookup, so tests need not touch the real environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            catalog_path: lookup("CATALOG_PATH")
                .unwrap_or_else(|| "data/properties.json".to_string())
                .into(),

            bind_addr: lookup("BIND_ADDR")
                .unwrap_or_else(|| "127.0.0.1:3001".to_string())
                .parse()
                .context("BIND_ADDR must be a socket address such as 127.0.0.1:3001")?,

            similar_limit: lookup("SIMILAR_LIMIT")
                .unwrap_or_else(|| "3".to_string())
                .parse()
                .context("SIMILAR_LIMIT must be a valid number")?,

            session_idle_timeout: Duration::from_secs(
                lookup("SESSION_IDLE_SECS")
                    .unwrap_or_else(|| "1800".to_string())
                    .parse()
                    .context("SESSION_IDLE_SECS must be a number of seconds")?,
            ),

            max_sessions: lookup("MAX_SESSIONS")
                .unwrap_or_else(|| "10000".to_string())
                .parse()
                .context("MAX_SESSIONS must be a valid number")?,
        })
    }
}
