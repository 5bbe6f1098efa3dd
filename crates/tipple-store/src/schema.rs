// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use rusqlite::Connection;

use crate::StoreError;

/// Idempotent schema bootstrap. `foreign_keys` is a per-connection
/// pragma and must run on every open, not just the first.
const BOOTSTRAP_SQL: &str = "
    CREATE TABLE IF NOT EXISTS users (
      id INTEGER PRIMARY KEY,
      username TEXT NOT NULL UNIQUE,
      email TEXT NOT NULL UNIQUE,
      password_hash TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS cocktails (
      id INTEGER PRIMARY KEY,
      name TEXT NOT NULL,
      instructions TEXT NOT NULL,
      image_url TEXT,
      glass_type TEXT
    );
    CREATE TABLE IF NOT EXISTS ingredients (
      id INTEGER PRIMARY KEY,
      name TEXT NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS cocktail_ingredients (
      id INTEGER PRIMARY KEY,
      cocktail_id INTEGER NOT NULL REFERENCES cocktails(id) ON DELETE CASCADE,
      ingredient_id INTEGER NOT NULL REFERENCES ingredients(id),
      amount TEXT NOT NULL DEFAULT ''
    );
    CREATE TABLE IF NOT EXISTS reviews (
      id INTEGER PRIMARY KEY,
      content TEXT NOT NULL,
      rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
      user_id INTEGER NOT NULL REFERENCES users(id),
      cocktail_id INTEGER NOT NULL REFERENCES cocktails(id) ON DELETE CASCADE
    );
    CREATE TABLE IF NOT EXISTS likes (
      user_id INTEGER NOT NULL REFERENCES users(id),
      cocktail_id INTEGER NOT NULL REFERENCES cocktails(id) ON DELETE CASCADE,
      PRIMARY KEY (user_id, cocktail_id)
    );
    CREATE INDEX IF NOT EXISTS idx_cocktail_ingredients_cocktail
      ON cocktail_ingredients(cocktail_id);
    CREATE INDEX IF NOT EXISTS idx_reviews_cocktail ON reviews(cocktail_id);
    CREATE INDEX IF NOT EXISTS idx_likes_cocktail ON likes(cocktail_id);
";

fn bootstrap(conn: &Connection) -> Result<(), StoreError> {
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(|e| StoreError::Sql(e.to_string()))?;
    conn.execute_batch(BOOTSTRAP_SQL)?;
    Ok(())
}

pub fn open_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory().map_err(|e| StoreError::Sql(e.to_string()))?;
    bootstrap(&conn)?;
    Ok(conn)
}

pub fn open_at(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path).map_err(|e| StoreError::Sql(e.to_string()))?;
    bootstrap(&conn)?;
    Ok(conn)
}
