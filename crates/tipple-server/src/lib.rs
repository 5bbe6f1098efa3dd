#![forbid(unsafe_code)]
//! HTTP layer: configuration, shared state, session store, router.
//!
//! Handlers authenticate via an opaque session cookie, take the single
//! database connection's lock for the duration of their store calls,
//! and answer with the projection views from `tipple-api`. Every
//! response carries an `x-request-id` header.

pub mod config;
mod http;
pub mod session;
mod state;

pub use config::ServerConfig;
pub use http::build_router;
pub use session::{SessionStore, SESSION_COOKIE};
pub use state::AppState;

pub const CRATE_NAME: &str = "tipple-server";
