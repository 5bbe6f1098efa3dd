#![forbid(unsafe_code)]
//! SQLite persistence layer.
//!
//! One logical request maps to one transaction; multi-write operations
//! open an explicit `rusqlite` transaction and either commit fully or
//! leave no trace. Uniqueness (usernames, emails, ingredient names,
//! like pairs) is enforced by the schema's constraints, never by a
//! check-then-insert, and surfaces as [`StoreError::Conflict`].

pub mod catalog;
pub mod credential;
mod error;
pub mod reviews;
pub mod schema;
pub mod social;
pub mod users;

pub use error::StoreError;
pub use rusqlite::Connection;

pub const CRATE_NAME: &str = "tipple-store";
