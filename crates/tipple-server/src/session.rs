// SPDX-License-Identifier: Apache-2.0
//! In-memory session map behind an async lock.
//!
//! Tokens are opaque: 32 random bytes, URL-safe base64 without
//! padding. Expired entries are dropped lazily on lookup, so the map
//! never grows past the set of tokens presented within one TTL window.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use tokio::sync::RwLock;

pub const SESSION_COOKIE: &str = "tipple_session";

#[derive(Debug, Clone, Copy)]
struct Session {
    user_id: i64,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a fresh token for the user and record it.
    pub async fn create(&self, user_id: i64) -> String {
        let token = mint_token();
        let session = Session {
            user_id,
            expires_at: Instant::now() + self.ttl,
        };
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    /// Resolve a presented token to a user id. An expired token is
    /// removed and treated the same as an unknown one.
    pub async fn resolve(&self, token: &str) -> Option<i64> {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if session.expires_at > now => return Some(session.user_id),
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().await.remove(token);
        None
    }

    pub async fn revoke(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }
}

fn mint_token() -> String {
    let mut bytes = [0_u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
