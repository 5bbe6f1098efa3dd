// SPDX-License-Identifier: Apache-2.0
//! Likes. The (user, cocktail) pair is the primary key, so both like
//! and unlike are idempotent at the storage level.

use rusqlite::{params, Connection};
use tracing::debug;

use crate::{catalog, StoreError};

fn like_count(conn: &Connection, cocktail_id: i64) -> Result<u64, StoreError> {
    let count: i64 = conn
        .prepare_cached("SELECT COUNT(*) FROM likes WHERE cocktail_id = ?1")?
        .query_row([cocktail_id], |row| row.get(0))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Record a like; repeating it is a no-op. Returns the resulting count.
pub fn like(conn: &mut Connection, cocktail_id: i64, user_id: i64) -> Result<u64, StoreError> {
    let tx = conn.transaction()?;
    catalog::fetch_cocktail(&tx, cocktail_id)?;
    let inserted = tx.execute(
        "INSERT OR IGNORE INTO likes (user_id, cocktail_id) VALUES (?1, ?2)",
        params![user_id, cocktail_id],
    )?;
    let count = like_count(&tx, cocktail_id)?;
    tx.commit()?;
    if inserted > 0 {
        debug!(cocktail_id, user_id, "like recorded");
    }
    Ok(count)
}

/// Remove a like; removing one that was never recorded is a no-op.
pub fn unlike(conn: &mut Connection, cocktail_id: i64, user_id: i64) -> Result<u64, StoreError> {
    let tx = conn.transaction()?;
    catalog::fetch_cocktail(&tx, cocktail_id)?;
    let removed = tx.execute(
        "DELETE FROM likes WHERE user_id = ?1 AND cocktail_id = ?2",
        params![user_id, cocktail_id],
    )?;
    let count = like_count(&tx, cocktail_id)?;
    tx.commit()?;
    if removed > 0 {
        debug!(cocktail_id, user_id, "like removed");
    }
    Ok(count)
}
