// SPDX-License-Identifier: Apache-2.0
//! Reviews, always scoped to a cocktail.

use rusqlite::{params, Connection};
use tracing::debug;

use tipple_model::{Rating, Review, User};

use crate::{catalog, StoreError};

/// All reviews for one cocktail, each paired with its author. Errors
/// with `NotFound` when the cocktail itself does not exist, so an
/// empty list always means "exists, no reviews yet".
pub fn reviews_for_cocktail(
    conn: &Connection,
    cocktail_id: i64,
) -> Result<Vec<(Review, User)>, StoreError> {
    catalog::fetch_cocktail(conn, cocktail_id)?;
    catalog::fetch_reviews(conn, cocktail_id)
}

pub fn create_review(
    conn: &mut Connection,
    cocktail_id: i64,
    author: &User,
    content: &str,
    rating: Rating,
) -> Result<(Review, User), StoreError> {
    let tx = conn.transaction()?;
    catalog::fetch_cocktail(&tx, cocktail_id)?;
    tx.execute(
        "INSERT INTO reviews (content, rating, user_id, cocktail_id) VALUES (?1, ?2, ?3, ?4)",
        params![content, rating.value(), author.id, cocktail_id],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    debug!(review_id = id, cocktail_id, "review created");
    Ok((
        Review {
            id,
            content: content.to_string(),
            rating,
            user_id: author.id,
            cocktail_id,
        },
        author.clone(),
    ))
}
