// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub(crate) fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

/// Environment-driven server configuration. A missing `TIPPLE_DB_PATH`
/// means an in-memory database, which lives exactly as long as the
/// process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub db_path: Option<PathBuf>,
    pub session_ttl: Duration,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            db_path: None,
            session_ttl: Duration::from_secs(24 * 60 * 60),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind: env::var("TIPPLE_BIND").unwrap_or(defaults.bind),
            db_path: env::var("TIPPLE_DB_PATH").ok().map(PathBuf::from),
            session_ttl: Duration::from_secs(env_u64(
                "TIPPLE_SESSION_TTL_SECS",
                defaults.session_ttl.as_secs(),
            )),
            max_body_bytes: env_usize("TIPPLE_MAX_BODY_BYTES", defaults.max_body_bytes),
        }
    }
}
