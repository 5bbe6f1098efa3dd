// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use tokio::sync::Mutex;

use tipple_store::Connection;

use crate::config::ServerConfig;
use crate::session::SessionStore;

/// Shared application state. The single SQLite connection sits behind
/// an async mutex; store calls are synchronous and run under the lock,
/// so one logical request is one serialized unit of work.
#[derive(Clone)]
pub struct AppState {
    pub conn: Arc<Mutex<Connection>>,
    pub sessions: Arc<SessionStore>,
    pub request_id_seed: Arc<AtomicU64>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(conn: Connection, config: ServerConfig) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            sessions: Arc::new(SessionStore::new(config.session_ttl)),
            request_id_seed: Arc::new(AtomicU64::new(1)),
            config: Arc::new(config),
        }
    }
}
